// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line flag set adapter backed by `clap`.
//!
//! This module provides [`ClapFlagSet`], which presents a `clap::Command` together
//! with the `ArgMatches` it produced as a [`FlagSet`]. Argument parsing stays with
//! `clap`; this adapter only reads the parsed state.

use crate::domain::ConfigValue;
use crate::ports::{Flag, FlagSet, FlagValue};
use clap::parser::{MatchesError, ValueSource};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::any::Any;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// A parsed `clap` command viewed as a flag set.
///
/// Every argument of the command is a flag named by its id, except the built-in
/// help and version arguments. Naming arguments with delimited ids such as
/// `database.host` gives nested configuration keys.
///
/// # Change tracking
///
/// A flag counts as changed when its value came from the command line or from an
/// environment variable. Values filled in from `default_value` are not changes.
///
/// # Values
///
/// Typed values are recovered for arguments whose value parser produces
/// `String`, `bool`, any primitive integer, `f32`/`f64`, `Duration`, `PathBuf` or
/// `OsString`. Arguments taking several values (`ArgAction::Append`, a value
/// delimiter, or `num_args` above one) become lists. Other types fall back to their raw text.
///
/// # Examples
///
/// ```rust
/// use clap::{value_parser, Arg, Command};
/// use flagcfg::adapters::{ClapFlagSet, FlagProvider};
/// use flagcfg::domain::ConfigValue;
/// use flagcfg::ports::ConfigProvider;
///
/// let mut command = Command::new("app")
///     .arg(Arg::new("server.host").long("server.host").default_value("localhost"))
///     .arg(
///         Arg::new("server.port")
///             .long("server.port")
///             .value_parser(value_parser!(u16))
///             .default_value("8080"),
///     );
/// let matches = command
///     .try_get_matches_from_mut(["app", "--server.port", "9090"])
///     .unwrap();
///
/// let flags = ClapFlagSet::new(&command, &matches);
/// let map = FlagProvider::new(&flags, ".").read().unwrap();
/// let server = map["server"].as_map("server").unwrap();
/// assert_eq!(server["host"], ConfigValue::from("localhost"));
/// assert_eq!(server["port"], ConfigValue::from(9090));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ClapFlagSet<'a> {
    command: &'a Command,
    matches: &'a ArgMatches,
}

impl<'a> ClapFlagSet<'a> {
    /// Creates a flag set from a command and the matches it produced.
    pub fn new(command: &'a Command, matches: &'a ArgMatches) -> Self {
        Self { command, matches }
    }

    fn flag(&self, arg: &'a Arg) -> ClapFlag<'a> {
        let id = arg.get_id().as_str();
        let changed = matches!(
            self.matches.value_source(id),
            Some(ValueSource::CommandLine) | Some(ValueSource::EnvVariable)
        );

        ClapFlag {
            name: id,
            changed,
            value: ClapValue {
                typed: typed_value(self.matches, id, takes_many(arg)),
                text: raw_text(self.matches, id),
            },
            default: default_text(arg),
        }
    }
}

impl FlagSet for ClapFlagSet<'_> {
    fn visit_all(&self, visitor: &mut dyn FnMut(&dyn Flag)) {
        for arg in self.command.get_arguments() {
            if is_builtin(arg) {
                continue;
            }
            let flag = self.flag(arg);
            visitor(&flag);
        }
    }
}

struct ClapFlag<'a> {
    name: &'a str,
    changed: bool,
    value: ClapValue,
    default: Option<String>,
}

impl Flag for ClapFlag<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn changed(&self) -> bool {
        self.changed
    }

    fn value(&self) -> &dyn FlagValue {
        &self.value
    }

    fn default_value(&self) -> Option<String> {
        self.default.clone()
    }
}

struct ClapValue {
    typed: Option<ConfigValue>,
    text: Option<String>,
}

impl FlagValue for ClapValue {
    fn get(&self) -> Option<ConfigValue> {
        self.typed.clone()
    }

    fn format(&self) -> Option<String> {
        self.text.clone()
    }
}

fn is_builtin(arg: &Arg) -> bool {
    matches!(
        arg.get_action(),
        ArgAction::Help | ArgAction::HelpShort | ArgAction::HelpLong | ArgAction::Version
    )
}

fn takes_many(arg: &Arg) -> bool {
    matches!(arg.get_action(), ArgAction::Append)
        || arg.get_value_delimiter().is_some()
        || arg
            .get_num_args()
            .is_some_and(|range| range.max_values() > 1)
}

/// Outcome of trying one concrete type against an argument.
enum Probe {
    /// The stored type matched (or the argument has no value at all).
    Matched(Option<ConfigValue>),
    /// The argument stores a different type.
    Mismatch,
}

fn probe<T>(matches: &ArgMatches, id: &str, many: bool, convert: fn(T) -> ConfigValue) -> Probe
where
    T: Any + Clone + Send + Sync + 'static,
{
    let result = if many {
        matches.try_get_many::<T>(id).map(|values| {
            values.map(|values| ConfigValue::List(values.cloned().map(convert).collect()))
        })
    } else {
        matches
            .try_get_one::<T>(id)
            .map(|value| value.cloned().map(convert))
    };

    match result {
        Ok(value) => Probe::Matched(value),
        Err(MatchesError::Downcast { .. }) => Probe::Mismatch,
        Err(e) => {
            tracing::trace!("Cannot read clap argument '{}': {}", id, e);
            Probe::Matched(None)
        }
    }
}

fn typed_value(matches: &ArgMatches, id: &str, many: bool) -> Option<ConfigValue> {
    macro_rules! probe_types {
        ($($ty:ty => $convert:expr),* $(,)?) => {
            $(
                if let Probe::Matched(value) = probe::<$ty>(matches, id, many, $convert) {
                    return value;
                }
            )*
        };
    }

    probe_types!(
        String => ConfigValue::from,
        bool => ConfigValue::from,
        i64 => ConfigValue::from,
        i32 => ConfigValue::from,
        i16 => ConfigValue::from,
        i8 => ConfigValue::from,
        isize => ConfigValue::from,
        u64 => ConfigValue::from,
        u32 => ConfigValue::from,
        u16 => ConfigValue::from,
        u8 => ConfigValue::from,
        usize => ConfigValue::from,
        f64 => ConfigValue::from,
        f32 => ConfigValue::from,
        Duration => ConfigValue::from,
        PathBuf => |path: PathBuf| ConfigValue::String(path.to_string_lossy().into_owned()),
        OsString => |text: OsString| ConfigValue::String(text.to_string_lossy().into_owned()),
    );

    tracing::trace!("No typed value for clap argument '{}'; using raw text", id);
    None
}

fn raw_text(matches: &ArgMatches, id: &str) -> Option<String> {
    let raw = matches.try_get_raw(id).ok().flatten()?;
    Some(
        raw.map(|value| value.to_string_lossy())
            .collect::<Vec<_>>()
            .join(","),
    )
}

fn default_text(arg: &Arg) -> Option<String> {
    let defaults = arg.get_default_values();
    if defaults.is_empty() {
        return None;
    }
    Some(
        defaults
            .iter()
            .map(|value| value.to_string_lossy())
            .collect::<Vec<_>>()
            .join(","),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FlagProvider;
    use crate::domain::{key_path::unflatten, ConfigTree};
    use crate::ports::ConfigProvider;
    use clap::value_parser;

    fn command() -> Command {
        Command::new("app")
            .arg(
                Arg::new("key.one-example")
                    .long("key.one-example")
                    .default_value("val1"),
            )
            .arg(
                Arg::new("key.int")
                    .long("key.int")
                    .value_parser(value_parser!(i64))
                    .default_value("123"),
            )
            .arg(
                Arg::new("key.float")
                    .long("key.float")
                    .value_parser(value_parser!(f64))
                    .default_value("123.123"),
            )
            .arg(
                Arg::new("key.strings")
                    .long("key.strings")
                    .action(ArgAction::Append)
                    .default_values(["1", "2", "3"]),
            )
            .arg(Arg::new("verbose").long("verbose").action(ArgAction::SetTrue))
            .arg(Arg::new("name").long("name"))
    }

    fn parse(args: &[&str]) -> (Command, ArgMatches) {
        let mut command = command();
        let matches = command.try_get_matches_from_mut(args.iter().copied()).unwrap();
        (command, matches)
    }

    fn collect(flags: &ClapFlagSet<'_>) -> Vec<(String, bool, Option<ConfigValue>)> {
        let mut out = Vec::new();
        flags.visit_all(&mut |flag: &dyn Flag| {
            out.push((flag.name().to_string(), flag.changed(), flag.value().get()))
        });
        out
    }

    #[test]
    fn test_flags_in_registration_order_without_help() {
        let (command, matches) = parse(&["app"]);
        let flags = ClapFlagSet::new(&command, &matches);
        let names = collect(&flags)
            .into_iter()
            .map(|(name, _, _)| name)
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "key.one-example",
                "key.int",
                "key.float",
                "key.strings",
                "verbose",
                "name"
            ]
        );
    }

    #[test]
    fn test_defaults_are_typed_and_unchanged() {
        let (command, matches) = parse(&["app"]);
        let flags = ClapFlagSet::new(&command, &matches);
        let seen = collect(&flags);

        assert_eq!(
            seen[0],
            ("key.one-example".to_string(), false, Some(ConfigValue::from("val1")))
        );
        assert_eq!(seen[1], ("key.int".to_string(), false, Some(ConfigValue::from(123))));
        assert_eq!(
            seen[2],
            ("key.float".to_string(), false, Some(ConfigValue::from(123.123)))
        );
        assert_eq!(
            seen[3],
            (
                "key.strings".to_string(),
                false,
                Some(ConfigValue::from(vec!["1", "2", "3"]))
            )
        );
        assert_eq!(seen[4], ("verbose".to_string(), false, Some(ConfigValue::from(false))));
        assert_eq!(seen[5], ("name".to_string(), false, None));
    }

    #[test]
    fn test_command_line_values_are_changed() {
        let (command, matches) = parse(&["app", "--key.int", "7", "--verbose", "--name", "x"]);
        let flags = ClapFlagSet::new(&command, &matches);
        let seen = collect(&flags);

        assert_eq!(seen[1], ("key.int".to_string(), true, Some(ConfigValue::from(7))));
        assert_eq!(seen[4], ("verbose".to_string(), true, Some(ConfigValue::from(true))));
        assert_eq!(seen[5], ("name".to_string(), true, Some(ConfigValue::from("x"))));
    }

    #[test]
    fn test_formatted_and_default_text() {
        let (command, matches) = parse(&["app", "--key.strings", "a", "--key.strings", "b"]);
        let flags = ClapFlagSet::new(&command, &matches);

        let mut strings = None;
        flags.visit_all(&mut |flag: &dyn Flag| {
            if flag.name() == "key.strings" {
                strings = Some((flag.value().format(), flag.default_value(), flag.changed()));
            }
        });

        assert_eq!(
            strings,
            Some((Some("a,b".to_string()), Some("1,2,3".to_string()), true))
        );
    }

    #[test]
    fn test_delimited_values_become_list() {
        let mut command = Command::new("app").arg(
            Arg::new("key.strings")
                .long("key.strings")
                .value_delimiter(',')
                .default_value("1,2,3"),
        );

        let defaults = command.try_get_matches_from_mut(["app"]).unwrap();
        let flags = ClapFlagSet::new(&command, &defaults);
        let map = FlagProvider::new(&flags, ".").read().unwrap();
        let key = map["key"].as_map("key").unwrap();
        assert_eq!(key["strings"], ConfigValue::from(vec!["1", "2", "3"]));

        let given = command
            .try_get_matches_from_mut(["app", "--key.strings", "a,b"])
            .unwrap();
        let flags = ClapFlagSet::new(&command, &given);
        let map = FlagProvider::new(&flags, ".").read().unwrap();
        let key = map["key"].as_map("key").unwrap();
        assert_eq!(key["strings"], ConfigValue::from(vec!["a", "b"]));
    }

    #[test]
    fn test_untyped_value_falls_back_to_text() {
        #[derive(Clone, Debug)]
        struct Level(String);

        let mut command = Command::new("app").arg(
            Arg::new("level")
                .long("level")
                .value_parser(|s: &str| Ok::<_, std::convert::Infallible>(Level(s.to_string())))
                .default_value("info"),
        );
        let matches = command.try_get_matches_from_mut(["app"]).unwrap();
        let flags = ClapFlagSet::new(&command, &matches);

        let map = FlagProvider::new(&flags, ".").read().unwrap();
        assert_eq!(map["level"], ConfigValue::from("info"));
    }

    #[test]
    fn test_provider_defaults_without_snapshot() {
        let (command, matches) = parse(&["app"]);
        let flags = ClapFlagSet::new(&command, &matches);
        let map = FlagProvider::new(&flags, ".").read().unwrap();

        let key = map["key"].as_map("key").unwrap();
        assert_eq!(key["one-example"], ConfigValue::from("val1"));
        assert_eq!(key["int"], ConfigValue::from(123));
        assert_eq!(map["verbose"], ConfigValue::from(false));
        assert_eq!(map["name"], ConfigValue::Null);
    }

    #[test]
    fn test_provider_with_snapshot() {
        let (command, matches) = parse(&["app", "--key.int", "7"]);
        let flags = ClapFlagSet::new(&command, &matches);
        let snapshot = ConfigTree::from_map(
            unflatten(
                vec![
                    ("key.int".to_string(), ConfigValue::from(5)),
                    ("key.one-example".to_string(), ConfigValue::from("file")),
                ],
                ".",
            ),
            ".",
        );

        let map = FlagProvider::new(&flags, ".")
            .with_snapshot(&snapshot)
            .read()
            .unwrap();

        let key = map["key"].as_map("key").unwrap();
        assert_eq!(key["int"], ConfigValue::from(7));
        assert!(!key.contains_key("one-example"));
        assert_eq!(key["float"], ConfigValue::from(123.123));
    }
}
