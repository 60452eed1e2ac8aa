//! `configs` command
//!
//! Shows or updates the stored credentials. Without flags an interactive
//! flow asks for the token (hidden) and company id, checks them by listing
//! payment accounts, then lets the user pick the default account.

use clap::Args;
use zeroize::Zeroizing;

use super::prompt::{prompt_parsed, prompt_secret, prompt_string};
use crate::config::{mask_token, ConfigKey, ConfigStore, Credentials, FileConfigStore};
use crate::error::{FicError, FicResult};
use crate::models::PaymentAccount;
use crate::services::ExpenseService;
use crate::session::{connect, Session};

/// Arguments of `configs`
#[derive(Debug, Args)]
pub struct ConfigsArgs {
    /// Show the current configuration and exit
    #[arg(long)]
    pub show: bool,

    /// Set the API access token
    #[arg(long)]
    pub token: Option<String>,

    /// Set the company ID
    #[arg(long)]
    pub company_id: Option<String>,

    /// Set the default payment account ID
    #[arg(long)]
    pub account_id: Option<String>,
}

impl ConfigsArgs {
    fn has_updates(&self) -> bool {
        self.token.is_some() || self.company_id.is_some() || self.account_id.is_some()
    }
}

/// Handle the `configs` command
pub fn handle_configs_command(session: &mut Session, args: ConfigsArgs) -> FicResult<()> {
    if args.show {
        print!("{}", format_config(session.store()));
        return Ok(());
    }

    if args.has_updates() {
        let store = session.store_mut();
        // Validate everything before writing anything
        let updates = [
            (ConfigKey::AccessToken, args.token.as_deref()),
            (ConfigKey::CompanyId, args.company_id.as_deref()),
            (ConfigKey::DefaultAccountId, args.account_id.as_deref()),
        ];
        for (key, value) in updates {
            if let Some(value) = value {
                if key != ConfigKey::AccessToken && value.trim().parse::<u64>().is_err() {
                    return Err(FicError::Validation(format!(
                        "{} must be a number, got '{}'",
                        key.label(),
                        value
                    )));
                }
            }
        }
        for (key, value) in updates {
            if let Some(value) = value {
                store.set(key, value)?;
                println!("✓ {} updated", key.label());
            }
        }
        println!();
        print!("{}", format_config(store));
        return Ok(());
    }

    run_interactive(session)
}

/// Current configuration, token masked
pub fn format_config(store: &FileConfigStore) -> String {
    let mut output = String::new();
    output.push_str("fic-expenses Configuration\n");
    output.push_str(&"=".repeat(26));
    output.push('\n');
    output.push_str(&format!(
        "Config file: {}\n\n",
        store.paths().settings_file().display()
    ));

    for key in ConfigKey::ALL {
        let value = match store.get(key) {
            Some(v) if key == ConfigKey::AccessToken => mask_token(&v),
            Some(v) => v,
            None => "(not set)".to_string(),
        };
        let source = if store.is_overridden(key) {
            format!("  [from {}]", key.env_var())
        } else {
            String::new()
        };
        output.push_str(&format!("  {:<25} {}{}\n", key.label(), value, source));
    }

    output
}

fn run_interactive(session: &mut Session) -> FicResult<()> {
    println!("fic-expenses setup");
    println!("{}", "─".repeat(30));
    println!("Get an access token and your company ID from the Fatture in Cloud");
    println!("developer settings. Press Enter to keep the current value.");
    println!();

    let current_token = session.store().get(ConfigKey::AccessToken);
    let current_company = session.store().get(ConfigKey::CompanyId);

    if let Some(token) = &current_token {
        println!("Current token: {}", mask_token(token));
    }
    let entered = Zeroizing::new(prompt_secret("Access token")?);
    let token = match (entered.is_empty(), current_token) {
        (false, _) => Zeroizing::new(entered.to_string()),
        (true, Some(current)) => Zeroizing::new(current),
        (true, None) => {
            return Err(FicError::Validation("Access token is required".to_string()));
        }
    };

    let company_id: u64 = prompt_parsed("Company ID", current_company.as_deref(), |s| {
        s.trim()
            .parse()
            .map_err(|_| FicError::Validation(format!("Company ID must be a number, got '{}'", s)))
    })?;

    println!();
    println!("Checking credentials...");
    let credentials = Credentials {
        access_token: token,
        company_id,
    };
    let client = connect(&credentials)?;
    let accounts = ExpenseService::new(&client)
        .payment_accounts()
        .map_err(explain_credential_error)?;
    println!("✓ Credentials valid!");

    let store = session.store_mut();
    store.set(ConfigKey::AccessToken, &credentials.access_token)?;
    store.set(ConfigKey::CompanyId, &company_id.to_string())?;

    if accounts.is_empty() {
        println!("No payment accounts found for this company.");
        println!("Create one in Fatture in Cloud, then run 'fic-expenses configs' again.");
        return Ok(());
    }

    let current_account = store.get(ConfigKey::DefaultAccountId);
    let account = select_account(&accounts, current_account.as_deref())?;
    store.set(ConfigKey::DefaultAccountId, &account.id.to_string())?;

    println!();
    println!("✓ Configuration saved to {}", store.paths().settings_file().display());
    println!("  Default payment account: {}", account);
    Ok(())
}

fn select_account<'a>(
    accounts: &'a [PaymentAccount],
    current: Option<&str>,
) -> FicResult<&'a PaymentAccount> {
    println!();
    println!("Payment accounts:");
    for (i, account) in accounts.iter().enumerate() {
        let marker = if current == Some(account.id.to_string().as_str()) {
            " (current)"
        } else {
            ""
        };
        println!("  {}. {}{}", i + 1, account, marker);
    }

    let default_choice = current
        .and_then(|c| accounts.iter().position(|a| a.id.to_string() == c))
        .map_or(1, |i| i + 1)
        .to_string();
    let answer = prompt_string("Default payment account", Some(&default_choice))?;
    let choice: usize = answer
        .parse()
        .map_err(|_| FicError::Validation(format!("Not a number: '{}'", answer)))?;

    choice
        .checked_sub(1)
        .and_then(|i| accounts.get(i))
        .ok_or_else(|| {
            FicError::Validation(format!(
                "Choose a number between 1 and {}",
                accounts.len()
            ))
        })
}

fn explain_credential_error(error: FicError) -> FicError {
    match error {
        FicError::Auth(_) => {
            FicError::Auth("Invalid access token or access denied for this company".to_string())
        }
        FicError::NotFound { .. } => FicError::Config("Company not found".to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppPaths;
    use tempfile::TempDir;

    #[test]
    fn test_format_config_masks_token() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut store = FileConfigStore::with_env(paths, Box::new(|_| None)).unwrap();
        store.set(ConfigKey::AccessToken, "a/abcdefghijklmnop").unwrap();
        store.set(ConfigKey::CompanyId, "42").unwrap();

        let output = format_config(&store);
        assert!(output.contains("a/ab********************mnop"));
        assert!(!output.contains("abcdefghijklmnop"));
        assert!(output.contains("42"));
        assert!(output.contains("(not set)"));
    }

    #[test]
    fn test_format_config_marks_env_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = FileConfigStore::with_env(
            paths,
            Box::new(|name| (name == "FIC_DEFAULT_ACCOUNT_ID").then(|| "7".to_string())),
        )
        .unwrap();

        let output = format_config(&store);
        assert!(output.contains("[from FIC_DEFAULT_ACCOUNT_ID]"));
    }

    #[test]
    fn test_credential_errors_are_explained() {
        let err = explain_credential_error(FicError::Auth("401".into()));
        assert!(err.to_string().contains("Invalid access token"));
        let err = explain_credential_error(FicError::NotFound {
            entity_type: "Company",
            identifier: "1".into(),
        });
        assert!(matches!(err, FicError::Config(_)));
    }
}
