//! Cross-module tests.



#[cfg(test)]
mod services_tests;

#[cfg(test)]
mod redaction_tests;
