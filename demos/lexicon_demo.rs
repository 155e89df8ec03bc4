use std::path::PathBuf;

use chainlex::Dawg;
use chainlex::HashMap;
use chainlex::Lexicon;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    /// Word list or binary DAWG file to load. A small built-in list is used
    /// when omitted.
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Write the loaded words back out as a binary DAWG.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Prefix to list words for.
    #[arg(short = 'p', long = "prefix", default_value = "")]
    prefix: String,

    /// Words to look up.
    queries: Vec<String>,
}

const BUILT_IN: &[&str] = &[
    "a", "ab", "aab", "aaab", "aardvark", "b", "banana", "band", "bandana", "cat", "cattle",
];

fn main() -> chainlex::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let lexicon = match &args.input {
        Some(path) => Lexicon::from_file(path)?,
        None => Lexicon::from_dawg(Dawg::from_words(BUILT_IN)?),
    };

    println!("Loaded {} words", lexicon.len());
    if let Some(dawg) = lexicon.dawg() {
        println!(
            "Compiled part: {} words in {} edges ({} bytes)",
            dawg.len(),
            dawg.edge_count(),
            dawg.edge_count() * 4
        );
    }
    if let (Some(first), Some(last)) = (lexicon.first(), lexicon.last()) {
        println!("First word: {first}, last word: {last}");
    }

    for query in &args.queries {
        println!(
            "{query:?}: word={} prefix={}",
            lexicon.contains(query),
            lexicon.contains_prefix(query)
        );
    }

    let mut by_length: HashMap<usize, usize> = HashMap::new();
    let mut matching = 0usize;
    lexicon.for_each(|word| {
        *by_length.entry(word.len()).or_insert(0) += 1;
        if word.starts_with(args.prefix.as_str()) {
            matching += 1;
            if matching <= 20 {
                println!("  {word}");
            }
        }
    });
    if matching > 20 {
        println!("  ... and {} more", matching - 20);
    }

    let mut lengths: Vec<(usize, usize)> = by_length.into_iter().collect();
    lengths.sort_unstable();
    println!("Word length histogram:");
    for (length, count) in lengths {
        println!("  {length:>3}: {count}");
    }

    if let Some(path) = &args.output {
        let dawg = lexicon.compile()?;
        let file = std::fs::File::create(path)?;
        dawg.write_to(std::io::BufWriter::new(file))?;
        println!(
            "Wrote {} words ({} edges) to {}",
            dawg.len(),
            dawg.edge_count(),
            path.display()
        );
    }

    Ok(())
}
