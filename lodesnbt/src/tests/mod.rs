mod path_tests;
mod roundtrip_tests;
