pub mod vagrant;
