pub mod locator_matcher;
