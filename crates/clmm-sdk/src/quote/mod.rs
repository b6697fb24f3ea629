pub mod apr;
pub mod position;
pub mod price;
pub mod reward;
pub mod swap;

pub use apr::*;
pub use position::*;
pub use price::*;
pub use reward::*;
pub use swap::*;
