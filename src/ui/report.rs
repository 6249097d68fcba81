//! Plain-text output for the one-shot subcommands.

use std::fmt::Write as _;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    domain::{
        chat::AssistantReply,
        customer::{format_backend_date, Customer, MAX_SCORE},
        customer_detail_state::{score_distribution, score_history},
    },
    usecases::lookup::CustomerListing,
};

const NAME_WIDTH: usize = 30;
const TAX_ID_WIDTH: usize = 20;

pub fn customer_table(listing: &CustomerListing) -> String {
    let mut out = String::new();

    if listing.customers.is_empty() {
        out.push_str("Nenhum cliente encontrado.\n");
    } else {
        let _ = writeln!(
            out,
            "{} {} {:>5}  {:<6} {:<4} {}",
            pad("NOME", NAME_WIDTH),
            pad("CPF/CNPJ", TAX_ID_WIDTH),
            "SCORE",
            "RISCO",
            "TIPO",
            "ID"
        );
        for customer in &listing.customers {
            let _ = writeln!(
                out,
                "{} {} {:>5}  {} {:<4} {}",
                pad(&customer.name, NAME_WIDTH),
                pad(&customer.tax_id, TAX_ID_WIDTH),
                customer.score,
                pad(customer.risk_class.label(), 6),
                customer.person_type.code(),
                customer.id
            );
        }
    }

    let pagination = &listing.pagination;
    let _ = writeln!(
        out,
        "Página {} de {} ({} clientes)",
        pagination.page,
        pagination.total_pages.max(1),
        pagination.total
    );
    out
}

pub fn customer_card(customer: &Customer) -> String {
    let mut rows: Vec<(&str, String)> = vec![
        ("Nome", customer.name.clone()),
        ("ID", customer.id.clone()),
        ("CPF/CNPJ", customer.tax_id.clone()),
        ("Tipo", customer.person_type.label().to_owned()),
        (
            "Score",
            format!("{} ({})", customer.score, customer.score_band().label()),
        ),
        ("Classe de Risco", customer.risk_class.label().to_owned()),
        (customer.financial_label(), customer.financial_value()),
        (
            "Status",
            if customer.active { "Ativo" } else { "Inativo" }.to_owned(),
        ),
    ];

    if customer.has_location() {
        rows.push(("Localização", customer.location_label()));
    }
    if let Some(created_at) = customer.created_at.as_deref() {
        rows.push(("Cliente desde", format_backend_date(created_at)));
    }
    if let Some(updated_at) = customer.updated_at.as_deref() {
        rows.push(("Atualizado em", format_backend_date(updated_at)));
    }

    let label_width = rows.iter().map(|(label, _)| label.width()).max().unwrap_or(0);
    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{}  {value}", pad(label, label_width));
    }

    out.push_str("\nDistribuição do Score\n");
    for (label, value) in score_distribution(customer) {
        let _ = writeln!(out, "  {}  {:>4}  {}", pad(label, 8), value, bar(value));
    }

    out.push_str("\nEvolução do Score\n");
    for point in score_history(customer) {
        let _ = writeln!(
            out,
            "  {}  {:>4}  {}",
            pad(point.month, 8),
            point.score,
            bar(point.score)
        );
    }
    out
}

const BAR_WIDTH: usize = 20;

/// Proportional bar of `#` over `BAR_WIDTH` columns.
fn bar(value: u16) -> String {
    let filled = usize::from(value.min(MAX_SCORE)) * BAR_WIDTH / usize::from(MAX_SCORE);
    "#".repeat(filled)
}

pub fn chat_reply(reply: &AssistantReply) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", reply.text.trim_end());

    let details = &reply.details;
    if details.used_database {
        out.push_str("\n[consultou a base de clientes]\n");
    }
    if let Some(sql) = details.sql_query.as_deref().filter(|sql| !sql.trim().is_empty()) {
        let _ = writeln!(out, "SQL: {sql}");
    }
    if let Some(model) = details.model.as_deref() {
        let _ = writeln!(out, "Modelo: {model}");
    }
    out
}

/// Pads or truncates to `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    let truncate = text.width() > width;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width + usize::from(truncate) > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    if truncate {
        out.push('…');
        used += 1;
    }

    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}
