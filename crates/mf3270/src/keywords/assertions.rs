use crate::text::{format_list, glob_to_regex};
use crate::{KeywordError, Mainframe3270};
use regex::RegexBuilder;
use tracing::info;

fn fail(message: Option<&str>, default: impl FnOnce() -> String) -> KeywordError {
    KeywordError::Assertion(message.map_or_else(default, str::to_string))
}

fn fold(text: &str, ignore_case: bool) -> String {
    if ignore_case {
        text.to_lowercase()
    } else {
        text.to_string()
    }
}

impl Mainframe3270 {
    /// Fail unless some screen row contains `text`
    pub async fn page_should_contain_string(
        &mut self,
        text: &str,
        ignore_case: bool,
        error_message: Option<&str>,
    ) -> Result<(), KeywordError> {
        let needle = fold(text, ignore_case);
        if !self.mf()?.search_string(&needle, ignore_case).await? {
            return Err(fail(error_message, || {
                format!("The string \"{text}\" was not found")
            }));
        }
        info!("The string \"{}\" was found", needle);
        Ok(())
    }

    pub async fn page_should_not_contain_string(
        &mut self,
        text: &str,
        ignore_case: bool,
        error_message: Option<&str>,
    ) -> Result<(), KeywordError> {
        let needle = fold(text, ignore_case);
        if self.mf()?.search_string(&needle, ignore_case).await? {
            return Err(fail(error_message, || format!("The string \"{text}\" was found")));
        }
        Ok(())
    }

    /// Fail unless at least one of `texts` is on the screen
    pub async fn page_should_contain_any_string(
        &mut self,
        texts: &[String],
        ignore_case: bool,
        error_message: Option<&str>,
    ) -> Result<(), KeywordError> {
        for text in texts {
            if self.mf()?.search_string(&fold(text, ignore_case), ignore_case).await? {
                return Ok(());
            }
        }
        Err(fail(error_message, || {
            format!("The strings \"{}\" were not found", format_list(texts))
        }))
    }

    /// Fail if any of `texts` is on the screen
    pub async fn page_should_not_contain_any_string(
        &mut self,
        texts: &[String],
        ignore_case: bool,
        error_message: Option<&str>,
    ) -> Result<(), KeywordError> {
        self.compare_all_with_screen(texts, ignore_case, error_message, false)
            .await
    }

    /// Fail unless every one of `texts` is on the screen
    pub async fn page_should_contain_all_strings(
        &mut self,
        texts: &[String],
        ignore_case: bool,
        error_message: Option<&str>,
    ) -> Result<(), KeywordError> {
        self.compare_all_with_screen(texts, ignore_case, error_message, true)
            .await
    }

    /// Fail as soon as one of `texts` is found on the screen
    pub async fn page_should_not_contain_all_strings(
        &mut self,
        texts: &[String],
        ignore_case: bool,
        error_message: Option<&str>,
    ) -> Result<(), KeywordError> {
        self.compare_all_with_screen(texts, ignore_case, error_message, false)
            .await
    }

    async fn compare_all_with_screen(
        &mut self,
        texts: &[String],
        ignore_case: bool,
        error_message: Option<&str>,
        should_match: bool,
    ) -> Result<(), KeywordError> {
        for text in texts {
            let needle = fold(text, ignore_case);
            let found = self.mf()?.search_string(&needle, ignore_case).await?;
            if found && !should_match {
                return Err(fail(error_message, || {
                    format!("The string \"{needle}\" was found")
                }));
            }
            if !found && should_match {
                return Err(fail(error_message, || {
                    format!("The string \"{needle}\" was not found")
                }));
            }
        }
        Ok(())
    }

    /// Fail unless `text` occurs exactly `count` times on the whole screen
    pub async fn page_should_contain_string_x_times(
        &mut self,
        text: &str,
        count: usize,
        ignore_case: bool,
        error_message: Option<&str>,
    ) -> Result<(), KeywordError> {
        let screen = fold(&self.mf()?.read_all_screen().await?, ignore_case);
        let needle = fold(text, ignore_case);
        let found = screen.matches(needle.as_str()).count();
        if found != count {
            return Err(fail(error_message, || {
                format!(
                    "The string \"{needle}\" was not found \"{count}\" times, it appears \"{found}\" times"
                )
            }));
        }
        info!("The string \"{}\" was found \"{}\" times", needle, count);
        Ok(())
    }

    /// Fail unless `pattern` matches somewhere on the screen.
    ///
    /// `^` and `$` match at line boundaries.
    pub async fn page_should_match_regex(&mut self, pattern: &str) -> Result<(), KeywordError> {
        if !self.screen_matches_regex(pattern).await? {
            return Err(KeywordError::Assertion(format!(
                "No matches found for \"{pattern}\" pattern"
            )));
        }
        Ok(())
    }

    pub async fn page_should_not_match_regex(&mut self, pattern: &str) -> Result<(), KeywordError> {
        if self.screen_matches_regex(pattern).await? {
            return Err(KeywordError::Assertion(format!(
                "There are matches found for \"{pattern}\" pattern"
            )));
        }
        Ok(())
    }

    async fn screen_matches_regex(&mut self, pattern: &str) -> Result<bool, KeywordError> {
        let regex = RegexBuilder::new(pattern).multi_line(true).build()?;
        let screen = self.mf()?.read_all_screen().await?;
        Ok(regex.is_match(&screen))
    }

    /// Fail unless the whole screen matches the glob `pattern`.
    ///
    /// `*` matches any run of characters and `?` a single character.
    pub async fn page_should_contain_match(
        &mut self,
        pattern: &str,
        ignore_case: bool,
        error_message: Option<&str>,
    ) -> Result<(), KeywordError> {
        let pattern = fold(pattern, ignore_case);
        if !self.screen_matches_glob(&pattern, ignore_case).await? {
            return Err(fail(error_message, || {
                format!("No matches found for \"{pattern}\" pattern")
            }));
        }
        Ok(())
    }

    pub async fn page_should_not_contain_match(
        &mut self,
        pattern: &str,
        ignore_case: bool,
        error_message: Option<&str>,
    ) -> Result<(), KeywordError> {
        let pattern = fold(pattern, ignore_case);
        if self.screen_matches_glob(&pattern, ignore_case).await? {
            return Err(fail(error_message, || {
                format!("There are matches found for \"{pattern}\" pattern")
            }));
        }
        Ok(())
    }

    async fn screen_matches_glob(&mut self, pattern: &str, ignore_case: bool) -> Result<bool, KeywordError> {
        let glob = glob_to_regex(pattern)?;
        let screen = fold(&self.mf()?.read_all_screen().await?, ignore_case);
        Ok(glob.is_match(&screen))
    }
}
