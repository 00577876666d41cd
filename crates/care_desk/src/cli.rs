use std::path::PathBuf;

use care_forms::dates::parse_date_time;
use care_forms::domains::FormKind;
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::store::Failure;

#[derive(Parser)]
#[command(name = "care_desk", version, about = "介護施設フォームの検証・登録ツール")]
pub struct Cli {
    /// Extra config file (toml or json5), applied after the config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base directory for config, data and logs
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print machine readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// List the available forms and their fields
    Forms,
    /// Check a JSON record against a form without saving it
    Validate {
        form: FormKind,
        file: PathBuf,
        /// Reference date for "not in the future" rules (default: today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Submit a JSON record through the form controller into the record store
    Submit {
        form: FormKind,
        file: PathBuf,
        /// Save as draft (draft/final forms only)
        #[arg(long)]
        draft: bool,
        /// Treat the file as an existing record and edit it
        #[arg(long)]
        edit: bool,
        /// Change a field before submitting: KEY=VALUE (VALUE may be JSON)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        sets: Vec<(String, Value)>,
        /// Make the record store fail
        #[arg(long, value_enum, default_value_t)]
        simulate: Failure,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Presence of a resident derived from their absence records
    Status {
        /// JSON array of absence records
        file: PathBuf,
        /// Point in time, e.g. 2025-01-25T14:00 (default: now)
        #[arg(long, value_parser = parse_instant)]
        at: Option<NaiveDateTime>,
    },
}

/// `key=value`. Lists, objects, quoted strings, booleans and `null` are read
/// as JSON; anything else (numbers included) is text.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    let value = match serde_json::from_str::<Value>(value) {
        Ok(json) if !json.is_number() => json,
        _ => Value::String(value.to_string()),
    };
    Ok((key.to_string(), value))
}

fn parse_instant(raw: &str) -> Result<NaiveDateTime, String> {
    parse_date_time(raw).ok_or_else(|| format!("not a date and time: `{raw}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn assignments() {
        assert_eq!(
            parse_assignment("priority=high").unwrap(),
            ("priority".to_string(), json!("high"))
        );
        assert_eq!(
            parse_assignment("targetStaffIds=[\"s1\",\"s2\"]").unwrap(),
            ("targetStaffIds".to_string(), json!(["s1", "s2"]))
        );
        assert_eq!(
            parse_assignment("isImportant=true").unwrap(),
            ("isImportant".to_string(), json!(true))
        );
        assert_eq!(
            parse_assignment("phone1=0312345678").unwrap(),
            ("phone1".to_string(), json!("0312345678"))
        );
        assert_eq!(
            parse_assignment("notes=").unwrap(),
            ("notes".to_string(), json!(""))
        );
        assert!(parse_assignment("=x").is_err());
        assert!(parse_assignment("priority").is_err());
    }

    #[test]
    fn submit_arguments() {
        let cli = Cli::try_parse_from([
            "care_desk",
            "submit",
            "handover",
            "handover.json",
            "--draft",
            "--set",
            "priority=urgent",
            "--simulate",
            "network",
        ])
        .unwrap();
        match cli.cmd {
            Cmd::Submit {
                form,
                draft,
                edit,
                sets,
                simulate,
                ..
            } => {
                assert_eq!(form, FormKind::Handover);
                assert!(draft);
                assert!(!edit);
                assert_eq!(sets, vec![("priority".to_string(), json!("urgent"))]);
                assert_eq!(simulate, Failure::Network);
            }
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn unknown_form_is_rejected() {
        assert!(Cli::try_parse_from(["care_desk", "validate", "payroll", "x.json"]).is_err());
    }
}
