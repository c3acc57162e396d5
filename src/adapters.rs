pub mod google_play;
