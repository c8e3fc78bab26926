// Resume matching and demand forecasting.
// Both sit behind traits so a model-backed service can replace the defaults.

pub mod forecast;
pub mod handlers;
pub mod resume;
