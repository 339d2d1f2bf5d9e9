// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn year_arg() -> Arg {
    Arg::new("year").long("year").short('y').required(true)
}

fn month_arg() -> Arg {
    Arg::new("month").long("month").short('m').required(true)
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn side_arg() -> Arg {
    Arg::new("side")
        .long("side")
        .value_parser(["projected", "actual"])
        .default_value("actual")
}

fn category_arg() -> Arg {
    Arg::new("category").long("category").short('c').required(true)
}

fn item_arg() -> Arg {
    Arg::new("item").long("item").short('i').required(true)
}

pub fn build_cli() -> Command {
    Command::new("monthwise")
        .about("Monthly budgets, reconciliation, yearly summaries and star-schema exports")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .env("MONTHWISE_USER")
                .global(true)
                .help("User whose documents to read and write"),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .env("MONTHWISE_DB")
                .global(true)
                .help("Path to the SQLite database"),
        )
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("budget")
                .about("Monthly budgets")
                .subcommand_required(true)
                .subcommand(
                    Command::new("show")
                        .about("Show a month, creating it from the default skeleton if missing")
                        .arg(year_arg())
                        .arg(month_arg())
                        .arg(json_arg()),
                )
                .subcommand(
                    Command::new("list")
                        .about("List stored months with their balances")
                        .arg(Arg::new("year").long("year").short('y'))
                        .arg(json_arg()),
                )
                .subcommand(
                    Command::new("income")
                        .about("Set regular and extra income for one side")
                        .arg(year_arg())
                        .arg(month_arg())
                        .arg(side_arg())
                        .arg(Arg::new("regular").long("regular").required(true))
                        .arg(Arg::new("extra").long("extra").default_value("0")),
                )
                .subcommand(
                    Command::new("add-category")
                        .about("Add a category to both trees")
                        .arg(year_arg())
                        .arg(month_arg())
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("rm-category")
                        .about("Remove a category from both trees")
                        .arg(year_arg())
                        .arg(month_arg())
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("add-item")
                        .about("Add a subcategory to both trees")
                        .arg(year_arg())
                        .arg(month_arg())
                        .arg(category_arg())
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("rm-item")
                        .about("Remove a subcategory from both trees")
                        .arg(year_arg())
                        .arg(month_arg())
                        .arg(category_arg())
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("set-cost")
                        .about("Set the projected cost or the manual actual cost of a subcategory")
                        .arg(year_arg())
                        .arg(month_arg())
                        .arg(category_arg())
                        .arg(item_arg())
                        .arg(side_arg())
                        .arg(Arg::new("amount").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Itemised spending against a subcategory")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(year_arg())
                        .arg(month_arg())
                        .arg(category_arg())
                        .arg(item_arg())
                        .arg(Arg::new("description").long("description").short('d').required(true))
                        .arg(Arg::new("amount").long("amount").short('a').required(true))
                        .arg(Arg::new("date").long("date").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(year_arg())
                        .arg(month_arg())
                        .arg(category_arg())
                        .arg(item_arg())
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(
                    Command::new("list")
                        .arg(year_arg())
                        .arg(month_arg())
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(Arg::new("item").long("item").short('i'))
                        .arg(json_arg()),
                ),
        )
        .subcommand(
            Command::new("account")
                .about("Net-worth accounts")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("year").long("year").short('y')),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("year").long("year").short('y'))
                        .arg(json_arg()),
                )
                .subcommand(
                    Command::new("set")
                        .about("Set one month's value")
                        .arg(Arg::new("account").required(true))
                        .arg(Arg::new("year").long("year").short('y'))
                        .arg(month_arg())
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("account").required(true))
                        .arg(Arg::new("year").long("year").short('y')),
                ),
        )
        .subcommand(
            Command::new("template")
                .about("Reusable budget skeletons")
                .subcommand_required(true)
                .subcommand(
                    Command::new("save")
                        .about("Capture a month's projected side")
                        .arg(year_arg())
                        .arg(month_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(Command::new("list").arg(json_arg()))
                .subcommand(
                    Command::new("apply")
                        .about("Overwrite a month with a template")
                        .arg(Arg::new("template").required(true))
                        .arg(year_arg())
                        .arg(month_arg()),
                )
                .subcommand(Command::new("rm").arg(Arg::new("template").required(true))),
        )
        .subcommand(
            Command::new("summary")
                .about("Yearly summaries")
                .subcommand_required(true)
                .subcommand(Command::new("refresh").arg(year_arg()).arg(json_arg()))
                .subcommand(Command::new("show").arg(year_arg()).arg(json_arg())),
        )
        .subcommand(
            Command::new("export")
                .about("Write the star-schema bundle for a year")
                .arg(year_arg())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .help("Output file, or directory with --dir; defaults to ExportedFinancialData{year}.zip"),
                )
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .action(ArgAction::SetTrue)
                        .help("Write the CSV files into a directory instead of a zip"),
                ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check projected/actual tree alignment")
                .arg(Arg::new("year").long("year").short('y'))
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand_required(true)
                .subcommand(
                    Command::new("user")
                        .about("Show or set the default user")
                        .arg(Arg::new("name")),
                ),
        )
}
