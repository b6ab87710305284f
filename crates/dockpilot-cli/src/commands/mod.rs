pub mod assets;
pub mod grid;
pub mod params;
pub mod project;
pub mod run;
