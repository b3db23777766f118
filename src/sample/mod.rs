pub(crate) mod sampler;
