mod helpers;
mod user_store_test;
