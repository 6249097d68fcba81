use anyhow::{anyhow, Result};

use crate::{
    api::blocking::BlockingCustomerSource,
    cli::{Cli, Command, CustomersArgs},
    infra::config::{ChatMode, ConfigOverrides, FileConfigAdapter},
    ui,
    usecases::{
        bootstrap::{self, LogSink},
        context::AppContext,
        lookup::{self, CustomerQuery},
    },
};

pub fn run(cli: Cli) -> Result<()> {
    let adapter = FileConfigAdapter::new(
        cli.config.as_deref(),
        ConfigOverrides {
            api_url: cli.api_url.clone(),
        },
    );

    match cli.command_or_default() {
        Command::Run => {
            let context = bootstrap::bootstrap(&adapter, LogSink::StateFile)?;
            let mut shell = bootstrap::compose_shell(&context)?;
            ui::shell::start(
                &context,
                shell.event_source.as_mut(),
                shell.orchestrator.as_mut(),
            )?;
        }
        Command::Customers(args) => {
            let context = bootstrap::bootstrap(&adapter, LogSink::Stderr)?;
            print_customers(&context, &args)?;
        }
        Command::Customer { id } => {
            let context = bootstrap::bootstrap(&adapter, LogSink::Stderr)?;
            let source = blocking_source(&context, context.config.chat.mode)?;
            let customer = lookup::customer_detail(&source, &id)?;
            print!("{}", ui::report::customer_card(&customer));
        }
        Command::Ask { message, plain } => {
            let context = bootstrap::bootstrap(&adapter, LogSink::Stderr)?;
            let mode = if plain {
                ChatMode::Plain
            } else {
                context.config.chat.mode
            };
            let source = blocking_source(&context, mode)?;
            let reply = lookup::ask(&source, &message.join(" "))?;
            print!("{}", ui::report::chat_reply(&reply));
        }
    }

    Ok(())
}

fn print_customers(context: &AppContext, args: &CustomersArgs) -> Result<()> {
    let filters = args.filters().map_err(|details| anyhow!(details))?;
    let query = CustomerQuery {
        page: args.page,
        per_page: args.per_page_or(context.config.list.per_page),
        filters,
        order: args.sort,
    };

    let source = blocking_source(context, context.config.chat.mode)?;
    let listing = lookup::list_customers(&source, &query)?;
    print!("{}", ui::report::customer_table(&listing));

    Ok(())
}

fn blocking_source(context: &AppContext, mode: ChatMode) -> Result<BlockingCustomerSource> {
    let client = bootstrap::build_client(context)?;
    let mut chat = context.config.chat.clone();
    chat.mode = mode;

    Ok(BlockingCustomerSource::new(client, chat)?)
}
