pub mod soundboard;
