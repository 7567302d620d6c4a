// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print pretty JSON instead of a table")
}

fn jsonl_flag() -> Arg {
    Arg::new("jsonl")
        .long("jsonl")
        .action(ArgAction::SetTrue)
        .help("Print one JSON object per line")
}

fn month_arg(required: bool) -> Arg {
    Arg::new("month")
        .long("month")
        .required(required)
        .help("Month as YYYY-MM")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

pub fn build_cli() -> Command {
    Command::new("lifeclip")
        .about("Personal life organizer: finances, habits, moods, cycle, and lists")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create or locate the database"))
        .subcommand(tx_cmd())
        .subcommand(category_cmd())
        .subcommand(card_cmd())
        .subcommand(month_cmd())
        .subcommand(cycle_cmd())
        .subcommand(habit_cmd())
        .subcommand(mood_cmd())
        .subcommand(wish_cmd())
        .subcommand(shop_cmd())
        .subcommand(doc_cmd())
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .about("Export transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("import").about("Import data").subcommand(
                Command::new("transactions")
                    .about("Import transactions from CSV")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Run consistency checks"))
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Track income and expenses")
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(Arg::new("date").long("date").required(true).help("Due date YYYY-MM-DD"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .help("income|expense"),
                )
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("card").long("card"))
                .arg(
                    Arg::new("status")
                        .long("status")
                        .default_value("planned")
                        .help("planned|settled|cancelled"),
                )
                .arg(
                    Arg::new("estimate")
                        .long("estimate")
                        .help("Projected amount, when different from the recorded one"),
                )
                .arg(
                    Arg::new("competence")
                        .long("competence")
                        .help("Month the transaction is attributed to (default: due date month)"),
                )
                .arg(
                    Arg::new("effective")
                        .long("effective")
                        .help("Effective date YYYY-MM-DD"),
                )
                .arg(
                    Arg::new("installment")
                        .long("installment")
                        .help("Installment position as INDEX/TOTAL, e.g. 2/10"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List transactions")
                .arg(month_arg(false))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("card").long("card"))
                .arg(Arg::new("status").long("status"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                )
                .arg(json_flag())
                .arg(jsonl_flag()),
        )
        .subcommand(
            Command::new("edit")
                .about("Edit fields of a transaction")
                .arg(id_arg())
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("effective").long("effective"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("card").long("card"))
                .arg(Arg::new("status").long("status"))
                .arg(Arg::new("estimate").long("estimate"))
                .arg(Arg::new("competence").long("competence")),
        )
        .subcommand(
            Command::new("settle")
                .about("Mark a transaction settled")
                .arg(id_arg())
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("Effective date (default: today)"),
                ),
        )
        .subcommand(Command::new("rm").about("Delete a transaction").arg(id_arg()))
        .subcommand(
            Command::new("rm-month")
                .about("Delete every transaction of a month")
                .arg(month_arg(true)),
        )
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage categories")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("parent").long("parent").help("Parent category name"))
                .arg(
                    Arg::new("income")
                        .long("income")
                        .action(ArgAction::SetTrue)
                        .help("Mark as an income category"),
                ),
        )
        .subcommand(Command::new("list"))
        .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true)))
}

fn card_cmd() -> Command {
    Command::new("card")
        .about("Manage cards")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("account").long("account")),
        )
        .subcommand(Command::new("list"))
        .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true)))
        .subcommand(
            Command::new("summary")
                .about("Per-month expense totals per card")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(usize))
                        .default_value("12"),
                )
                .arg(json_flag())
                .arg(jsonl_flag()),
        )
}

fn month_cmd() -> Command {
    Command::new("month")
        .about("Monthly views over the finances")
        .subcommand(
            Command::new("summary")
                .about("Income/expense totals and category distribution")
                .arg(month_arg(true))
                .arg(json_flag())
                .arg(jsonl_flag()),
        )
        .subcommand(
            Command::new("open")
                .about("Open a month, carrying the previous month forward when empty")
                .arg(month_arg(true)),
        )
}

fn cycle_cmd() -> Command {
    Command::new("cycle")
        .about("Menstrual cycle tracking")
        .subcommand(
            Command::new("settings")
                .about("Show or update cycle settings")
                .arg(
                    Arg::new("last-period")
                        .long("last-period")
                        .help("Last period start date YYYY-MM-DD"),
                )
                .arg(
                    Arg::new("cycle-length")
                        .long("cycle-length")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("period-length")
                        .long("period-length")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("luteal-length")
                        .long("luteal-length")
                        .value_parser(value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("log")
                .about("Record one day (upserts on date)")
                .arg(Arg::new("date").long("date").required(true))
                .arg(
                    Arg::new("flow")
                        .long("flow")
                        .default_value("none")
                        .help("none|light|moderate|heavy"),
                )
                .arg(
                    Arg::new("symptoms")
                        .long("symptoms")
                        .help("Comma-separated symptom tags"),
                )
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(
            Command::new("stats")
                .about("Cycle statistics")
                .arg(Arg::new("today").long("today").help("Override today (YYYY-MM-DD)"))
                .arg(json_flag()),
        )
}

fn habit_cmd() -> Command {
    Command::new("habit")
        .about("Habit tracking")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("frequency")
                        .long("frequency")
                        .required(true)
                        .help("daily, weekdays:mon,wed,fri or weekly:N"),
                ),
        )
        .subcommand(Command::new("list"))
        .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true)))
        .subcommand(
            Command::new("done")
                .about("Mark a habit completed for a day")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("date").long("date").help("Default: today")),
        )
        .subcommand(
            Command::new("undo")
                .about("Remove a completion mark")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("date").long("date").help("Default: today")),
        )
        .subcommand(
            Command::new("stats")
                .about("Progress and streaks")
                .arg(Arg::new("name").long("name").required(true))
                .arg(month_arg(false))
                .arg(Arg::new("today").long("today").help("Override today (YYYY-MM-DD)"))
                .arg(
                    Arg::new("policy")
                        .long("policy")
                        .help("eager|lenient weekly-quota policy (default: lenient)"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("policy")
                .about("Show or set the default weekly-quota policy")
                .arg(Arg::new("set").long("set").help("eager|lenient")),
        )
}

fn mood_cmd() -> Command {
    Command::new("mood")
        .about("Mood journal")
        .subcommand(
            Command::new("log")
                .about("Record one day (upserts on date)")
                .arg(Arg::new("date").long("date").required(true))
                .arg(
                    Arg::new("rating")
                        .long("rating")
                        .required(true)
                        .value_parser(value_parser!(u8))
                        .help("Day rating 0-5"),
                )
                .arg(
                    Arg::new("emotions")
                        .long("emotions")
                        .help("Comma-separated emotion tags"),
                ),
        )
        .subcommand(
            Command::new("list")
                .arg(month_arg(false))
                .arg(json_flag())
                .arg(jsonl_flag()),
        )
        .subcommand(
            Command::new("summary")
                .about("Average rating and top emotions for a month")
                .arg(month_arg(true)),
        )
}

fn wish_cmd() -> Command {
    Command::new("wish")
        .about("Wishlist")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("price").long("price"))
                .arg(
                    Arg::new("priority")
                        .long("priority")
                        .value_parser(value_parser!(u32))
                        .default_value("0"),
                )
                .arg(Arg::new("url").long("url"))
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(
            Command::new("list").arg(
                Arg::new("all")
                    .long("all")
                    .action(ArgAction::SetTrue)
                    .help("Include purchased items"),
            ),
        )
        .subcommand(Command::new("bought").arg(id_arg()))
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn shop_cmd() -> Command {
    Command::new("shop")
        .about("Shopping list")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("qty")
                        .long("qty")
                        .value_parser(value_parser!(u32))
                        .default_value("1"),
                ),
        )
        .subcommand(
            Command::new("list").arg(
                Arg::new("all")
                    .long("all")
                    .action(ArgAction::SetTrue)
                    .help("Include checked items"),
            ),
        )
        .subcommand(Command::new("check").arg(id_arg()))
        .subcommand(Command::new("clear").about("Remove checked items"))
}

fn doc_cmd() -> Command {
    Command::new("doc")
        .about("Document registry")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("path").long("path").required(true))
                .arg(Arg::new("tags").long("tags").help("Comma-separated tags")),
        )
        .subcommand(Command::new("list").arg(Arg::new("tag").long("tag")))
        .subcommand(Command::new("rm").arg(id_arg()))
}
