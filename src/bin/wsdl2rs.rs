use std::{env, io, path::PathBuf, process::ExitCode};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wsdl2rs::signature::synthesize;
use wsdl2rs::{
    analyze, generate, generate_to_dir, strategy_for, GeneratorConfig, Layout, SchemaTree,
    WsdlError,
};

#[derive(Debug, Default)]
struct GenerateOptions {
    out_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    layout: Option<Layout>,
    namespace: Option<String>,
    indent: Option<String>,
    expand_arguments: bool,
    skip_argument_check: bool,
}

impl GenerateOptions {
    /// Loads the config file, if any, then applies command-line overrides.
    fn into_config(self) -> Result<GeneratorConfig, String> {
        let mut config = match &self.config_path {
            Some(path) => GeneratorConfig::from_path(path).map_err(|e| e.to_string())?,
            None => GeneratorConfig::default(),
        };
        if let Some(layout) = self.layout {
            config.layout = layout;
        }
        if let Some(namespace) = self.namespace {
            config.namespace = Some(namespace);
        }
        if let Some(indent) = self.indent {
            config.indent = indent;
        }
        config.expand_arguments |= self.expand_arguments;
        config.skip_argument_check |= self.skip_argument_check;
        Ok(config)
    }
}

fn main() -> ExitCode {
    init_tracing();
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "wsdl2rs=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(args: Vec<String>) -> Result<(), String> {
    if args.len() < 3 {
        return Err("not enough arguments".to_string());
    }

    let command = args[1].as_str();
    if !matches!(command, "generate" | "print" | "check") {
        return Err(format!("unknown command '{command}'"));
    }
    let file = PathBuf::from(&args[2]);
    let tree = SchemaTree::from_path(&file).map_err(|e| e.to_string())?;

    match command {
        "generate" => {
            let mut options = parse_generate_options(&args[3..])?;
            let out_dir = options
                .out_dir
                .take()
                .ok_or_else(|| "--out <dir> is required for generate command".to_string())?;
            let config = options.into_config()?;
            let written = generate_to_dir(&tree, &config, &out_dir).map_err(|e| e.to_string())?;
            for path in written {
                println!("{}", path.display());
            }
            Ok(())
        }
        "print" => {
            let options = parse_print_options(&args[3..])?;
            let config = options.into_config()?;
            let output = generate(&tree, &config).map_err(|e| e.to_string())?;
            for file in strategy_for(Layout::Single).package(&output, &config) {
                print!("{}", file.contents);
            }
            Ok(())
        }
        "check" => {
            if let Some(extra) = args.get(3) {
                return Err(format!("unknown option '{extra}'"));
            }
            run_check(&tree)
        }
        _ => unreachable!("validated above"),
    }
}

fn run_check(tree: &SchemaTree) -> Result<(), String> {
    let analysis = analyze(tree).map_err(|e| e.to_string())?;

    println!("classes:");
    for class in &analysis.classes.classes {
        match &class.base_name {
            Some(base) => println!("  {} extends {}", class.validated_name, base),
            None => println!("  {}", class.validated_name),
        }
    }

    println!("services:");
    for service in &analysis.services {
        println!("  {}", service.validated_name);
        for set in service.groups.iter() {
            let (entries, _) = synthesize(set);
            let signatures: Vec<String> = entries.iter().map(|e| e.describe()).collect();
            println!("    {}: {}", set.name(), signatures.join(" | "));
        }
    }
    Ok(())
}

fn parse_generate_options(args: &[String]) -> Result<GenerateOptions, String> {
    let mut options = GenerateOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--out" => {
                options.out_dir = Some(PathBuf::from(option_value(args, i, "--out")?));
                i += 2;
            }
            "--config" => {
                options.config_path = Some(PathBuf::from(option_value(args, i, "--config")?));
                i += 2;
            }
            "--layout" => {
                let value = option_value(args, i, "--layout")?;
                let layout: Layout = value.parse().map_err(|e: WsdlError| e.to_string())?;
                options.layout = Some(layout);
                i += 2;
            }
            "--namespace" => {
                options.namespace = Some(option_value(args, i, "--namespace")?.to_string());
                i += 2;
            }
            "--indent" => {
                options.indent = Some(parse_indent(option_value(args, i, "--indent")?)?);
                i += 2;
            }
            "--expand-arguments" => {
                options.expand_arguments = true;
                i += 1;
            }
            "--skip-argument-check" => {
                options.skip_argument_check = true;
                i += 1;
            }
            other => return Err(format!("unknown option '{other}'")),
        }
    }

    Ok(options)
}

/// Generate options minus the ones that only make sense when writing files.
fn parse_print_options(args: &[String]) -> Result<GenerateOptions, String> {
    let options = parse_generate_options(args)?;
    if options.out_dir.is_some() {
        return Err("--out is not accepted by print command".to_string());
    }
    if options.layout.is_some() {
        return Err("--layout is not accepted by print command".to_string());
    }
    Ok(options)
}

fn option_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("missing value for {flag}"))
}

fn parse_indent(value: &str) -> Result<String, String> {
    if value == "tab" {
        return Ok("\t".to_string());
    }
    match value.parse::<usize>() {
        Ok(width) if width > 0 => Ok(" ".repeat(width)),
        _ => Err(format!(
            "invalid value for --indent: '{value}' (expected a positive number or 'tab')"
        )),
    }
}

fn print_usage() {
    eprintln!("usage:");
    eprintln!("  wsdl2rs generate <tree.json> --out <dir> [options]");
    eprintln!("  wsdl2rs print <tree.json> [options]");
    eprintln!("  wsdl2rs check <tree.json>");
    eprintln!();
    eprintln!("options:");
    eprintln!("  --config <cfg.json>     load generator settings from a JSON file");
    eprintln!("  --layout <layout>       custom, conventional or single (generate only)");
    eprintln!("  --namespace <name>      wrap output in a module of this name");
    eprintln!("  --indent <n|tab>        indentation unit for generated code");
    eprintln!("  --expand-arguments      emit typed parameters from the first overload");
    eprintln!("  --skip-argument-check   omit the runtime argument-shape check");
    eprintln!();
    eprintln!("logging is controlled by RUST_LOG (default: wsdl2rs=warn).");
}
