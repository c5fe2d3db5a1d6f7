mod cold_start;
mod inputs;
mod search;

#[allow(dead_code)]
#[path = "../../benches/test_functions.rs"]
mod test_functions;
