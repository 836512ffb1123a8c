mod content;
mod copy_text;
mod evidence;
mod parse;
mod paths;
mod types;

pub use content::*;
pub use copy_text::*;
pub use evidence::*;
pub use parse::*;
pub use paths::*;
pub use types::*;
