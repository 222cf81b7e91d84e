use std::path::PathBuf;

use clap::Parser;

/// Aichya Gavat, a Satvik heritage chef that cooks from your cookbooks.
///
/// Memorizes the given PDF cookbooks, then recommends Konkani and Marathi
/// Satvik recipes that fit your mood.
#[derive(Parser, Debug)]
#[command(name = "chef", about = "Satvik heritage chef that recommends recipes from your PDF cookbooks")]
pub struct CliArgs {
    /// PDF cookbooks to memorize at startup (default: the configured cookbook)
    pub files: Vec<PathBuf>,

    /// Gemini API key (overrides env var and config file)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Model name override (default: gemini-2.5-flash)
    #[arg(long)]
    pub model: Option<String>,

    /// Path to config file (default: ~/.config/satvik-chef/config.toml)
    #[arg(long)]
    pub config: Option<String>,

    /// Maximum number of cookbook characters placed in the prompt
    #[arg(long, value_parser = parse_char_budget)]
    pub max_corpus_chars: Option<usize>,
}

/// A character budget must leave room for at least one character.
pub fn parse_char_budget(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_char_budget_is_rejected() {
        assert!(CliArgs::try_parse_from(["chef", "--max-corpus-chars", "0"]).is_err());
        assert!(CliArgs::try_parse_from(["chef", "--max-corpus-chars", "lots"]).is_err());

        let args = CliArgs::try_parse_from(["chef", "--max-corpus-chars", "1"]).unwrap();
        assert_eq!(args.max_corpus_chars, Some(1));
    }
}
