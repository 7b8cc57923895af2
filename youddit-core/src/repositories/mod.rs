pub mod file_credentials;

pub use file_credentials::FileCredentialsRepository;
pub use youddit_common::traits::repository_traits::CredentialsRepository;
