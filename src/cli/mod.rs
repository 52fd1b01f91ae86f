use clap::Parser;

/// Action registry and routing of CLI arguments.
pub mod dispatcher;
/// One handler per operator action.
pub mod handlers;

const HELP_TEMPLATE: &str = "\
<title>cmdalias</title> {version}
{about}

<title>USAGE</title>
  cmdalias [--config <hl>PATH</hl>] [--manifest <hl>PATH</hl>] <cmd><ACTION></cmd> [args...]
  cmdalias <cmd><text...></cmd>              <dim>(shortcut for `resolve`)</dim>

<title>ACTIONS</title>
  <group>Inspect</group>
    <cmd>list</cmd>, <cmd>ls</cmd> [player|admin|all]   List commands with their aliases
    <cmd>show</cmd>, <cmd>help</cmd> <<hl>command</hl>>      Show everything known about one command
    <cmd>resolve</cmd>, <cmd>res</cmd> <<hl>text...</hl>>    Resolve raw input to its canonical form
    <cmd>info</cmd>                         Config file and general settings
    <cmd>colors</cmd>                       Preview the reply palette
  <group>Maintain</group>
    <cmd>reload</cmd>                       Re-read the config file and reconcile it
    <cmd>save</cmd>                         Write the current configuration back to disk
    <cmd>watch</cmd>                        Hot-reload on file changes; resolve lines from stdin

<title>OPTIONS</title>
{options}
<dim>Set RUST_LOG=debug for detailed logging.</dim>
";

/// Builds the color-aware help string at runtime.
fn build_help_string() -> &'static str {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = HELP_TEMPLATE
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// cmdalias: inspect, resolve and hot-reload a configurable command catalog.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
/// Top-level command-line arguments.
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Config file (or directory) to use instead of the default location.
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<String>,

    /// TOML command manifest to discover commands from instead of the built-in one.
    #[arg(long, short = 'm', value_name = "PATH")]
    pub manifest: Option<String>,

    /// The action followed by its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_options_before_action() {
        let cli = Cli::try_parse_from([
            "cmdalias",
            "--config",
            "/tmp/x.json",
            "resolve",
            "tphorse",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/x.json"));
        assert!(cli.manifest.is_none());
        assert_eq!(cli.args, vec!["resolve", "tphorse", "-v"]);
    }

    #[test]
    fn test_cli_without_action() {
        let cli = Cli::try_parse_from(["cmdalias"]).unwrap();
        assert!(cli.args.is_empty());
    }
}
