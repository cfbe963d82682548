mod log_monitor_tests;
