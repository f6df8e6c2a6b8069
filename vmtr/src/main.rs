use clap::Parser;
use color_print::cprintln;
use indexmap::IndexMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use vmtr::util::display::{dump, render_asm, render_summary};
use vmtr::{Assembler, Error, Options, Unit};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input `.vm` file or directory of `.vm` files
    #[clap(default_value = ".")]
    input: String,

    /// Output file [default: <dir>/<dir>.asm or <stem>.asm]
    #[clap(short, long)]
    output: Option<String>,

    /// Do not emit the startup code
    #[clap(long)]
    no_bootstrap: bool,

    /// Function called by the startup code
    #[clap(short, long, default_value = "Sys.init")]
    entry: String,

    /// Dump translated code
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    println!("Hack VM Translator by kanade-k-1228");
    if let Err(e) = run(&args) {
        e.print_diag();
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let input = Path::new(&args.input);

    println!("1. Read Files");
    let mut sources: IndexMap<String, (PathBuf, String)> = IndexMap::new();
    for path in collect(input)? {
        println!("  < {}", path.display());
        let name = unit_name(&path);
        let text = read(&path)?;
        if let Some((prev, _)) = sources.insert(name.clone(), (path.clone(), text)) {
            cprintln!(
                "<y,s>warn</>: unit `{}` defined twice. {} replaces {}",
                name,
                path.display(),
                prev.display()
            );
        }
    }

    println!("2. Parse Lines");
    let units = sources
        .iter()
        .map(|(name, (_, text))| Unit::parse(name, text))
        .collect::<Result<Vec<_>, _>>()?;

    println!("3. Translate");
    let options = Options {
        bootstrap: !args.no_bootstrap,
        entry: args.entry.clone(),
    };
    let program = Assembler::new(options).assemble(&units)?;
    if args.verbose {
        dump(&program);
    }

    println!("4. Write Files");
    let output = match &args.output {
        Some(path) => PathBuf::from(path),
        None => default_output(input),
    };
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let summary = output.with_file_name(format!("{}_summary.txt", stem));
    write(&output, &render_asm(&program))?;
    write(&summary, &render_summary(&program))?;

    cprintln!(
        "<g,s>Finished</>: {} units, {} instructions",
        units.len(),
        program.rom_size()
    );
    Ok(())
}

/// `.vm` files under `input` in name order, or `input` itself.
fn collect(input: &Path) -> Result<Vec<PathBuf>, Error> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }
    let dir = input.display().to_string();
    let mut paths = vec![];
    for entry in std::fs::read_dir(input).map_err(|e| Error::ReadDir(dir.clone(), e))? {
        let path = entry.map_err(|e| Error::ReadDir(dir.clone(), e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "vm") {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(Error::NoSource(dir));
    }
    paths.sort();
    Ok(paths)
}

fn unit_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn default_output(input: &Path) -> PathBuf {
    if input.is_dir() {
        let name = input
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|s| s.to_string_lossy().to_string()))
            .unwrap_or_else(|| "out".to_string());
        input.join(format!("{}.asm", name))
    } else {
        input.with_extension("asm")
    }
}

fn read(path: &Path) -> Result<String, Error> {
    let name = path.display().to_string();
    let mut file = File::open(path).map_err(|e| Error::FileOpen(name.clone(), e))?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|e| Error::FileRead(name, e))?;
    Ok(text)
}

fn write(path: &Path, text: &str) -> Result<(), Error> {
    println!("  > {}", path.display());
    let name = path.display().to_string();
    let mut file = File::create(path).map_err(|e| Error::FileCreate(name.clone(), e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| Error::FileWrite(name, e))
}
