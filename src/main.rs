//! Visitor forms - command-line driver
//!
//! Walks through the registration or booking form line by line on stdin and
//! submits it to the dry-run backend.
//!
//! ```text
//! visitor-forms register
//! visitor-forms sign-in [--accept]
//! visitor-forms book [email] [display name]
//! ```

use anyhow::{bail, Result};
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use visitor_forms::remote::{DryRunBackend, Identity, NavigationRequest, Navigator};
use visitor_forms::state::{FeedbackMessage, FormField};
use visitor_forms::{start_booking, BookingStart, FormWorkflow, SubmitOutcome, WorkflowConfig};

type Lines = io::Lines<io::StdinLock<'static>>;

/// Prints route transitions instead of performing them
struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, request: &NavigationRequest) {
        match &request.locale {
            Some(locale) => println!("-> {} [{locale}]", request.path),
            None => println!("-> {}", request.path),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "visitor_forms=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match WorkflowConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "falling back to default configuration");
            WorkflowConfig::default()
        }
    };
    let config = Rc::new(config);
    let backend = Arc::new(DryRunBackend::new());
    let navigator = Arc::new(ConsoleNavigator);
    let mut input = io::stdin().lock().lines();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("register") => {
            let workflow = FormWorkflow::registration(backend, navigator, config);
            run_form(&workflow, &mut input).await
        }
        Some("sign-in") => {
            let backend = match args.next().as_deref() {
                Some("--accept") => Arc::new(DryRunBackend::new().with_sign_in()),
                _ => backend,
            };
            let workflow = FormWorkflow::registration(backend, navigator, config);
            let outcome = workflow.sign_in_externally().await;
            report(&workflow);
            if matches!(outcome, SubmitOutcome::Succeeded(_)) {
                workflow.drive_timers().await;
            }
            workflow.teardown();
            Ok(())
        }
        Some("book") => {
            let identity = args.next().map(|email| Identity {
                display_name: {
                    let name = args.collect::<Vec<_>>().join(" ");
                    if name.is_empty() {
                        email.clone()
                    } else {
                        name
                    }
                },
                email,
                is_anonymous: false,
            });
            match start_booking(identity, backend, navigator, config).await {
                BookingStart::Ready { workflow, identity } => {
                    println!("Hi, {}. Who are you trying to visit?", identity.display_name);
                    run_form(&workflow, &mut input).await
                }
                BookingStart::Redirected(_) => Ok(()),
            }
        }
        _ => {
            eprintln!("usage: visitor-forms <register | sign-in [--accept] | book [email] [display name]>");
            std::process::exit(2);
        }
    }
}

/// Prompt for each field, submit, and repeat until the form goes through or
/// input runs out. On a retry only the fields still in error are asked again.
async fn run_form(workflow: &FormWorkflow, input: &mut Lines) -> Result<()> {
    loop {
        for field in workflow.fields().iter() {
            if field.touched && workflow.visible_error(&field.name).is_none() {
                continue;
            }
            let Some(value) = prompt(field, input)? else {
                workflow.teardown();
                bail!("input closed before the form was submitted");
            };
            workflow.set_field_value(&field.name, value);
            workflow.mark_touched(&field.name);
            if let Some(err) = workflow.visible_error(&field.name) {
                println!("  ! {}", err.message);
            }
        }

        let outcome = workflow.submit().await;
        report(workflow);
        match outcome {
            SubmitOutcome::Succeeded(_) => {
                workflow.drive_timers().await;
                workflow.teardown();
                return Ok(());
            }
            SubmitOutcome::Failed(_) => {
                print!("Press Enter to try again: ");
                io::stdout().flush()?;
                if input.next().transpose()?.is_none() {
                    workflow.teardown();
                    return Ok(());
                }
            }
            SubmitOutcome::Blocked(_) => println!("Please correct the fields above."),
            SubmitOutcome::Ignored(reason) => bail!("submission ignored: {reason:?}"),
            SubmitOutcome::Discarded => return Ok(()),
        }
    }
}

/// Read one value. Select fields accept either the option text or its number.
fn prompt(field: &FormField, input: &mut Lines) -> Result<Option<String>> {
    let options = field.options();
    for (i, option) in options.iter().enumerate() {
        println!("  {}) {}", i + 1, option);
    }
    print!("{}: ", field.label);
    io::stdout().flush()?;

    let Some(line) = input.next().transpose()? else {
        return Ok(None);
    };
    let line = line.trim().to_string();
    let picked = line
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| options.get(i));
    Ok(Some(match picked {
        Some(option) => option.to_string(),
        None => line,
    }))
}

fn report(workflow: &FormWorkflow) {
    if let Some(FeedbackMessage { text, severity }) = workflow.feedback() {
        println!("[{}] {}", severity.label(), text);
    }
}
