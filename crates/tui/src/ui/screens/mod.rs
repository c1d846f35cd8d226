pub mod capital_flow;
