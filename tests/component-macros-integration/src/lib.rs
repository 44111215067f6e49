//! component-macros 集中测试工程
