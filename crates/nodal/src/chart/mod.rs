pub mod calculator;
pub mod houses;
pub mod response;
pub mod zodiac;

pub use calculator::{ChartCalculator, ChartOptions, ChartResult};
pub use houses::assign_house;
pub use response::{ChartResponse, NodeResponse};
pub use zodiac::{opposite_house, sign_and_degree, Sign, ZodiacPlacement};
