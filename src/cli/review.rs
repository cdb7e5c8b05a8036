use colored::Colorize;
use comfy_table::{Cell, Table};
use dialoguer::Input;

use super::{prepare_ledger, Context};
use crate::error::Result;
use crate::fmt::money;
use crate::models::Transaction;
use crate::processed::ProcessedSet;
use crate::reviewer::{Review, Step};

enum Action {
    Label(String),
    Keep,
    Skip,
    Back,
    Learn,
    ToggleHidden,
    Quit,
}

fn parse_action(input: &str, labels: &[String]) -> Action {
    let trimmed = input.trim();
    match trimmed.to_lowercase().as_str() {
        "" => Action::Keep,
        "s" => Action::Skip,
        "b" => Action::Back,
        "m" => Action::Learn,
        "h" => Action::ToggleHidden,
        "q" => Action::Quit,
        _ => match trimmed.parse::<usize>() {
            Ok(n) if n >= 1 && n <= labels.len() => Action::Label(labels[n - 1].clone()),
            _ => Action::Label(trimmed.to_string()),
        },
    }
}

fn show(txn: &Transaction, position: usize, total: usize, processed: bool) {
    println!("{}", "\u{2500}".repeat(60));
    let seen = if processed {
        " (reviewed)".dimmed().to_string()
    } else {
        String::new()
    };
    println!("  [{}/{}]{seen}", position + 1, total);
    println!("  Date:        {}", txn.date);
    let amt_str = if txn.amount_value() < 0.0 {
        money(txn.amount_value()).red().to_string()
    } else {
        money(txn.amount_value()).green().to_string()
    };
    println!("  Amount:      {amt_str}");
    println!("  Cr/Dr:       {}", txn.credit_debit);
    println!("  Type:        {}", txn.txn_type);
    println!("  Description: {}", txn.description);
    println!("  Category:    {}", txn.category);
    let label = if txn.custom_identifier.is_empty() {
        "(none)".dimmed().to_string()
    } else {
        txn.custom_identifier.bold().to_string()
    };
    println!("  Label:       {label}");
    println!();
}

fn print_labels(labels: &[String]) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Label"]);
    for (i, label) in labels.iter().enumerate() {
        table.add_row(vec![Cell::new(i + 1), Cell::new(label)]);
    }
    println!("Labels\n{table}\n");
}

fn advance(review: &mut Review<'_>) -> bool {
    match review.next() {
        Step::Moved => true,
        _ => {
            println!("{}", "This is the last transaction.".yellow());
            false
        }
    }
}

/// A failed write to the processed log is reported and the review goes on.
fn record_and_advance(review: &mut Review<'_>, label: &str, processed: &mut ProcessedSet) -> bool {
    if let Err(e) = review.record(label, processed) {
        println!("{}", format!("Failed to save processed transaction: {e}").red());
    }
    advance(review)
}

pub fn run(ctx: &Context, hide_processed: bool) -> Result<()> {
    let (mut ledger, mut mappings, result) = prepare_ledger(ctx)?;
    ledger.save(&ctx.paths.ledger)?;
    let mut processed = ProcessedSet::load(&ctx.paths.processed)?;
    let labels = &ctx.settings.labels;

    println!(
        "{} transactions, {} matched by {} mappings\n",
        ledger.len(),
        result.matched,
        mappings.len()
    );
    print_labels(labels);
    println!("Enter a label or #, Enter=keep, s=skip, b=back, m=map description, h=toggle hide labeled, q=quit\n");

    let mut review = Review::new(&mut ledger, hide_processed);
    loop {
        let Some(txn) = review.current() else {
            let msg = if review.is_empty() {
                "Nothing to review."
            } else {
                "No more transactions."
            };
            println!("{}", msg.green());
            break;
        };
        let current_label = txn.custom_identifier.clone();
        show(txn, review.position(), review.len(), processed.is_processed(&txn.natural_key()));

        let input: String = Input::new()
            .with_prompt("Label")
            .allow_empty(true)
            .interact_text()
            .unwrap_or_else(|_| "q".to_string());

        match parse_action(&input, labels) {
            Action::Quit => {
                println!("{}", "Review paused.".yellow());
                break;
            }
            Action::Skip => {
                if !advance(&mut review) {
                    break;
                }
            }
            Action::Back => {
                if review.prev() == Step::AtStart {
                    println!("{}", "This is the first transaction.".yellow());
                }
            }
            Action::ToggleHidden => {
                let hide = !review.hides_processed();
                review.set_hide_processed(hide);
                println!("Hide labeled: {}", if hide { "on" } else { "off" });
            }
            Action::Learn => {
                let label: String = Input::new()
                    .with_prompt("Map this description to label")
                    .default(current_label.clone())
                    .interact_text()
                    .unwrap_or_default();
                match review.learn(&label, &mut mappings) {
                    Ok((key, result)) => {
                        if let Err(e) = mappings.save(&ctx.paths.mappings) {
                            println!("{}", format!("Failed to save mappings: {e}").red());
                        }
                        println!(
                            "{}",
                            format!(
                                "Mapping added: '{key}' \u{2192} {} ({} matched)",
                                label.trim(),
                                result.matched
                            )
                            .green()
                        );
                    }
                    Err(e) => println!("{}", e.to_string().yellow()),
                }
            }
            Action::Keep => {
                if !record_and_advance(&mut review, &current_label, &mut processed) {
                    break;
                }
            }
            Action::Label(label) => {
                if !record_and_advance(&mut review, &label, &mut processed) {
                    break;
                }
            }
        }
    }
    drop(review);

    ledger.save(&ctx.paths.ledger)?;
    println!("{}", format!("Labels saved to '{}'.", ctx.paths.ledger.display()).green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        vec!["Coffee".to_string(), "Rent".to_string()]
    }

    #[test]
    fn test_parse_action_commands() {
        assert!(matches!(parse_action("", &labels()), Action::Keep));
        assert!(matches!(parse_action("  Q ", &labels()), Action::Quit));
        assert!(matches!(parse_action("s", &labels()), Action::Skip));
        assert!(matches!(parse_action("b", &labels()), Action::Back));
        assert!(matches!(parse_action("m", &labels()), Action::Learn));
        assert!(matches!(parse_action("h", &labels()), Action::ToggleHidden));
    }

    #[test]
    fn test_parse_action_picks_numbered_label() {
        match parse_action("2", &labels()) {
            Action::Label(l) => assert_eq!(l, "Rent"),
            _ => panic!("expected label"),
        }
        match parse_action("7", &labels()) {
            Action::Label(l) => assert_eq!(l, "7"),
            _ => panic!("expected label"),
        }
        match parse_action(" Eating out ", &labels()) {
            Action::Label(l) => assert_eq!(l, "Eating out"),
            _ => panic!("expected label"),
        }
    }
}
