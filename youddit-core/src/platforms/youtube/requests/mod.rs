pub mod playlist_items;
