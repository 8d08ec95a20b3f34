//! Host and alias command handlers.

use netmagis_api::{Client, HostForm, HostOptions, HostRecord};

use crate::cli::{AddArgs, GlobalOpts, OutputFormat, UpdateArgs};
use crate::error::CliError;
use crate::output::{self, DetailRow};

use super::util;

// ── Detail views ────────────────────────────────────────────────────

fn record_detail(record: &HostRecord) -> Vec<DetailRow> {
    output::pairs_to_rows(&record.to_table_cells())
}

fn form_detail(form: &HostForm) -> Vec<DetailRow> {
    form.fields
        .iter()
        .map(|(name, value)| DetailRow {
            label: name.clone(),
            value: value.clone(),
        })
        .collect()
}

fn record_line(record: &HostRecord) -> String {
    match record.ip_address {
        Some(ip) => format!("{}\t{ip}", record.fqdn()),
        None => record.fqdn(),
    }
}

fn status(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn search(
    client: &mut Client,
    host: &str,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    let record = client
        .search(host)
        .await?
        .ok_or_else(|| CliError::NotFound { fqdn: host.into() })?;
    let out = output::render_single(format, &record, record_detail, record_line);
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn show(
    client: &mut Client,
    fqdn: &str,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    let form = client
        .get_host_for_edit(fqdn)
        .await?
        .ok_or_else(|| CliError::NotFound { fqdn: fqdn.into() })?;
    let out = output::render_single(format, &form, form_detail, |f| {
        f.record_id().unwrap_or_default().to_owned()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn add(client: &mut Client, args: AddArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let options = util::merge_options(HostOptions::default(), args.options);
    client
        .create_host(&args.fqdn, args.address, &options, args.multiple)
        .await?;
    status(global, &format!("Host {} added ({})", args.fqdn, args.address));
    Ok(())
}

/// Read-modify-write: start from the current form, overlay the flags.
pub async fn update(
    client: &mut Client,
    args: UpdateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let form = client
        .get_host_for_edit(&args.fqdn)
        .await?
        .ok_or_else(|| CliError::NotFound {
            fqdn: args.fqdn.clone(),
        })?;
    let record_id = form
        .record_id()
        .ok_or_else(|| CliError::UnexpectedMarkup {
            message: format!("edit form of '{}' carries no record id", args.fqdn),
            raw_body: None,
        })?
        .to_owned();

    let options = util::merge_options(form.to_options(), args.options);
    client.update_host(&args.fqdn, &record_id, &options).await?;
    status(global, &format!("Host {} updated", args.fqdn));
    Ok(())
}

pub async fn delete(client: &mut Client, fqdn: &str, global: &GlobalOpts) -> Result<(), CliError> {
    if !util::confirm(&format!("Delete host '{fqdn}'?"), "delete", global.yes)? {
        status(global, "Aborted");
        return Ok(());
    }
    client.delete_host(fqdn).await?;
    status(global, &format!("Host {fqdn} removed"));
    Ok(())
}

pub async fn alias(
    client: &mut Client,
    alias: &str,
    target: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    client.create_alias(alias, target).await?;
    status(global, &format!("Alias {alias} -> {target} added"));
    Ok(())
}
