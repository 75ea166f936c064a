mod tree_printer;

pub use tree_printer::{TreeLine, render_tree};
