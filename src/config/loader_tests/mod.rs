mod mock_fs;

mod layering_tests;
