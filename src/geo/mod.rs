pub mod replay;
pub mod sampler;
