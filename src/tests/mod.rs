mod declaration_tests;
mod evidence_tests;
mod inference_tests;
mod utils;
