pub mod live_outputs;
