use consoler::{Binding, Matcher, Options};

fn main() {
    let options = Options::new("[-v] [--output=|-o=] [from] to -- copy things")
        .expect("Invalid option definition");
    let tokens: Vec<String> = std::env::args().skip(1).collect();

    match Matcher::new(&options).match_tokens(&tokens) {
        Some(matches) => {
            let mut names: Vec<&str> = matches.iter().map(|(name, _)| name).collect();
            names.sort();

            for name in names {
                match matches.get(name) {
                    Some(Binding::Flag(value)) => println!("{name}: {value}"),
                    Some(Binding::Count(count)) => println!("{name}: {count}"),
                    Some(Binding::Value(value)) => println!("{name}: {value:?}"),
                    Some(Binding::Positional(value)) => println!("{name}: '{value}'"),
                    None => {}
                }
            }

            println!("remaining: {:?}", matches.remaining());
        }
        None => {
            println!("No match for: {}", options.to_definition());
            std::process::exit(1);
        }
    }
}
