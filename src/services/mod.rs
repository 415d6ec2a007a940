pub mod aggregator;
pub mod breadth;
pub mod cache;
pub mod calculations;
pub mod indices;
pub mod market;
pub mod sectors;
pub mod source;
pub mod spread;
pub mod table;
pub mod terminal;
