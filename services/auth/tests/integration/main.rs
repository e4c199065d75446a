mod credentials_test;
mod password_reset_test;
mod social_test;
