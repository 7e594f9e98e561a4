// Copyright 2023 Remi Bernotavicius

use clap::Parser;
use clap::Subcommand;
use recipe_book::{NewRecipe, RecipeBook, RecipeCategoryId, RecipeId};
use std::path::PathBuf;

mod demo;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T> = std::result::Result<T, Error>;

#[derive(Parser, Debug)]
#[command(about = "A personal recipe book")]
struct Args {
    /// Database file to use instead of the one in the user data directory.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Log more; repeat for even more.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    commands: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add some sample recipes and exercise the recipe book with them (the default).
    Demo,
    Add {
        name: String,
        #[arg(long)]
        instructions: String,
        /// Ingredient to add with the recipe, `NAME` or `NAME=QUANTITY`.
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,
        #[arg(short, long = "category")]
        categories: Vec<String>,
    },
    Remove {
        id: i32,
    },
    Show {
        id: i32,
    },
    Search {
        query: String,
    },
    Random,
    List {
        /// Only list recipes in this category.
        #[arg(long)]
        category: Option<i32>,
    },
    Categories,
    Grocery {
        #[command(subcommand)]
        command: GroceryCommands,
    },
}

#[derive(Debug, Subcommand)]
enum GroceryCommands {
    List,
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    Remove {
        name: String,
    },
}

/// This is where the database and other user-data lives on-disk. On Linux it should be like:
/// `~/.local/share/recipe_book/`
fn data_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().ok_or("failed to get user home directory")?;
    let path = dirs.data_dir().join("recipe_book");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .env()
        .init()?;
    Ok(())
}

fn parse_ingredient(arg: &str) -> (&str, Option<&str>) {
    match arg.split_once('=') {
        Some((name, quantity)) => (name.trim(), Some(quantity.trim())),
        None => (arg.trim(), None),
    }
}

fn add(
    book: &mut RecipeBook,
    name: String,
    instructions: String,
    ingredients: Vec<String>,
    categories: Vec<String>,
) -> Result<()> {
    let mut new_recipe = NewRecipe::new(name, instructions);
    for arg in &ingredients {
        new_recipe = match parse_ingredient(arg) {
            (name, Some(quantity)) => new_recipe.ingredient_with_quantity(name, quantity),
            (name, None) => new_recipe.ingredient(name),
        };
    }
    for category in categories {
        new_recipe = new_recipe.category(category);
    }

    let added = book.add_recipe(new_recipe)?;
    println!("added recipe {}: {}", added.recipe.id, added.recipe);
    Ok(())
}

fn show(book: &mut RecipeBook, id: RecipeId) -> Result<()> {
    let details = book.get_recipe(id)?;
    println!("{} ({})", details.recipe, details.recipe.id);
    if !details.categories.is_empty() {
        let names: Vec<_> = details.categories.iter().map(|c| &c.name[..]).collect();
        println!("categories: {}", names.join(", "));
    }
    println!();
    for i in &details.ingredients {
        match &i.quantity {
            Some(q) => println!("  - {q} {}", i.ingredient),
            None => println!("  - {}", i.ingredient),
        }
    }
    println!();
    println!("{}", details.recipe.instructions);
    Ok(())
}

fn grocery(book: &mut RecipeBook, command: GroceryCommands) -> Result<()> {
    match command {
        GroceryCommands::List => {
            for i in book.grocery_list()? {
                println!("{i}");
            }
        }
        GroceryCommands::Add { names } => {
            for i in book.add_to_grocery_list(&names)? {
                println!("added '{i}' to grocery list");
            }
        }
        GroceryCommands::Remove { name } => match book.remove_from_grocery_list(&name)? {
            Some(i) => println!("removed '{i}' from grocery list"),
            None => println!("'{name}' isn't on the grocery list"),
        },
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let path = match args.database {
        Some(path) => path,
        None => data_path()?.join("recipe_book.sqlite"),
    };
    let mut book = RecipeBook::open(path)?;

    match args.commands.unwrap_or(Commands::Demo) {
        Commands::Demo => demo::run(&mut book)?,
        Commands::Add {
            name,
            instructions,
            ingredients,
            categories,
        } => add(&mut book, name, instructions, ingredients, categories)?,
        Commands::Remove { id } => {
            let removed = book.remove_recipe(RecipeId::from(id))?;
            println!("removed recipe {}: {removed}", removed.id);
        }
        Commands::Show { id } => show(&mut book, RecipeId::from(id))?,
        Commands::Search { query } => {
            for r in book.search_recipe(&query)? {
                println!("{}\t{r}", r.id);
            }
        }
        Commands::Random => {
            let picked = book.random_recipe()?;
            show(&mut book, picked.recipe.id)?;
        }
        Commands::List { category } => {
            let recipes = match category {
                Some(id) => book.recipes_in_category(RecipeCategoryId::from(id))?,
                None => book.recipes()?,
            };
            for r in recipes {
                println!("{}\t{r}", r.id);
            }
        }
        Commands::Categories => {
            for c in book.categories()? {
                println!("{}\t{c}", c.id);
            }
        }
        Commands::Grocery { command } => grocery(&mut book, command)?,
    }
    Ok(())
}

#[test]
fn args_parse() {
    use clap::CommandFactory as _;
    Args::command().debug_assert();

    let args = Args::try_parse_from(["recipe-book", "grocery", "add", "eggs", "bacon"]).unwrap();
    assert!(matches!(
        args.commands,
        Some(Commands::Grocery {
            command: GroceryCommands::Add { ref names }
        }) if names == &["eggs", "bacon"]
    ));

    let args = Args::try_parse_from(["recipe-book", "-vv"]).unwrap();
    assert_eq!(args.verbose, 2);
    assert!(args.commands.is_none());
}

#[test]
fn ingredient_quantities() {
    assert_eq!(parse_ingredient("eggs"), ("eggs", None));
    assert_eq!(parse_ingredient("eggs = 2"), ("eggs", Some("2")));
    assert_eq!(
        parse_ingredient("parmesan cheese=1 cup"),
        ("parmesan cheese", Some("1 cup"))
    );
}

#[test]
fn add_from_command_line() {
    let mut book = RecipeBook::open_in_memory().unwrap();
    add(
        &mut book,
        "Omelette".into(),
        "whisk and fry".into(),
        vec!["eggs=3".into(), "butter".into()],
        vec!["Breakfast".into()],
    )
    .unwrap();

    let recipe = &book.search_recipe("omelette").unwrap()[0];
    let details = book.get_recipe(recipe.id).unwrap();
    assert_eq!(details.ingredients[0].quantity.as_deref(), Some("3"));
    assert_eq!(details.ingredients[1].quantity, None);
    assert_eq!(details.categories[0].name, "Breakfast");
}
