//! Handlers for the non-interactive subcommands

use std::io::Write;
use std::path::Path;
use std::{panic, thread};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use rpitx_device::{
    Amplifier, BoardModel, Catalog, Component, ConfigStore, Device, Filter, FilterSlot,
};
use tracing::info;

/// Slot value that leaves a filter position empty
pub const NOT_INSTALLED: &str = "none";

/// Separates model number and case style in `MODEL@CASE`
pub const CASE_SEPARATOR: char = '@';

const FILTERS_DIR: &str = "filters";
const AMPLIFIERS_DIR: &str = "amplifiers";

/// Which component catalog to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogKind {
    Filters,
    Amplifiers,
}

/// Print every supported board
pub fn boards<W: Write>(out: &mut W) -> Result<()> {
    for model in BoardModel::ALL {
        let lna = match model.lna_switch() {
            Some(kind) => format!(", LNA via {}", kind),
            None => String::new(),
        };
        writeln!(
            out,
            "{:<32} {} filters ({}){}",
            model.name(),
            model.filter_count(),
            model.filter_switch(),
            lna
        )?;
    }
    Ok(())
}

/// Print the boards that have a saved configuration
pub fn configs<W: Write>(store: &ConfigStore, out: &mut W) -> Result<()> {
    let saved = store.saved_models()?;
    if saved.is_empty() {
        writeln!(out, "No saved configurations in {}", store.dir().display())?;
        return Ok(());
    }
    for model in saved {
        writeln!(out, "{:<32} {}", model.name(), store.path_for(model).display())?;
    }
    Ok(())
}

/// Print a saved configuration
pub fn show<W: Write>(store: &ConfigStore, model: BoardModel, out: &mut W) -> Result<()> {
    let config = store.load(model)?;
    let device = Device::from_config(config)?;
    writeln!(out, "{}", device.describe_configuration())?;
    Ok(())
}

/// Print case styles and the models available in each
///
/// With `case` set only that case style is listed.
pub fn catalog<W: Write>(
    dir: &Path,
    kind: CatalogKind,
    case: Option<&str>,
    out: &mut W,
) -> Result<()> {
    match kind {
        CatalogKind::Filters => {
            let catalog = Catalog::<Filter>::load_dir(&dir.join(FILTERS_DIR))?;
            pick_list(&catalog, case, out)
        }
        CatalogKind::Amplifiers => {
            let catalog = Catalog::<Amplifier>::load_dir(&dir.join(AMPLIFIERS_DIR))?;
            pick_list(&catalog, case, out)
        }
    }
}

fn pick_list<T: Component, W: Write>(
    catalog: &Catalog<T>,
    case: Option<&str>,
    out: &mut W,
) -> Result<()> {
    let styles = match case {
        Some(case) => vec![case],
        None => catalog.case_styles(),
    };

    for style in styles {
        writeln!(out, "{}:", style)?;
        let mut empty = true;
        for record in catalog.models_in_case(style) {
            empty = false;
            writeln!(
                out,
                "  {}{}{}  {}",
                record.model_number(),
                CASE_SEPARATOR,
                style,
                record.description()
            )?;
        }
        if empty {
            writeln!(out, "  no models")?;
        }
    }
    Ok(())
}

/// Pick a record by `MODEL@CASE`, or by `MODEL` alone when the model comes
/// in a single case style
fn select<'a, T: Component>(catalog: &'a Catalog<T>, kind: &str, part: &str) -> Result<&'a T> {
    if let Some((model, case)) = part.split_once(CASE_SEPARATOR) {
        return catalog
            .find(model, case)
            .with_context(|| {
                format!("{} {} in case {} not found in catalog", kind, model, case)
            });
    }

    let cases: Vec<&str> = catalog
        .case_styles()
        .into_iter()
        .filter(|case| catalog.find(part, case).is_some())
        .collect();
    match cases.as_slice() {
        [] => bail!("{} {} not found in catalog", kind, part),
        [case] => catalog
            .find(part, case)
            .with_context(|| format!("{} {} not found in catalog", kind, part)),
        _ => bail!(
            "{} {} comes in several case styles ({}), name one as {}{}CASE",
            kind,
            part,
            cases.join(", "),
            part,
            CASE_SEPARATOR
        ),
    }
}

/// Build a configuration from catalog parts
///
/// Parts are `MODEL@CASE` or a bare `MODEL`. Filter slots are filled in
/// order; slots past the end of `filters` stay empty. Catalogs are only
/// read when a component is named.
pub fn build_device(
    model: BoardModel,
    filters: &[String],
    amplifier: Option<&str>,
    catalog_dir: &Path,
) -> Result<Device> {
    let count = usize::from(model.filter_count());
    if filters.len() > count {
        bail!(
            "{} has {} filter slots, {} filters given",
            model,
            count,
            filters.len()
        );
    }
    if amplifier.is_some() && !model.supports_lna() {
        bail!("{} has no LNA stage", model);
    }

    let need_filters = filters.iter().any(|f| !f.eq_ignore_ascii_case(NOT_INSTALLED));
    let (filter_catalog, amplifier_catalog) =
        load_catalogs(catalog_dir, need_filters, amplifier.is_some())?;

    let mut device = Device::new(model);
    for (index, name) in (1..).zip(filters) {
        let slot = if name.eq_ignore_ascii_case(NOT_INSTALLED) {
            FilterSlot::NotInstalled
        } else {
            let catalog = filter_catalog.as_ref().context("filter catalog not loaded")?;
            FilterSlot::Installed(select(catalog, "filter", name)?.clone())
        };
        device.assign_filter(index, slot)?;
    }

    if let Some(name) = amplifier {
        let catalog = amplifier_catalog
            .as_ref()
            .context("amplifier catalog not loaded")?;
        device.assign_amplifier(select(catalog, "amplifier", name)?.clone())?;
    }

    Ok(device)
}

type Catalogs = (Option<Catalog<Filter>>, Option<Catalog<Amplifier>>);

fn load_catalogs(dir: &Path, filters: bool, amplifiers: bool) -> Result<Catalogs> {
    let filter_dir = dir.join(FILTERS_DIR);
    let amplifier_dir = dir.join(AMPLIFIERS_DIR);

    let (filter_catalog, amplifier_catalog) = thread::scope(|s| {
        let filter_task = filters.then(|| s.spawn(|| Catalog::<Filter>::load_dir(&filter_dir)));
        let amplifier_task =
            amplifiers.then(|| s.spawn(|| Catalog::<Amplifier>::load_dir(&amplifier_dir)));

        (filter_task.map(join), amplifier_task.map(join))
    });

    let filter_catalog = filter_catalog.transpose().context("loading filter catalog")?;
    let amplifier_catalog = amplifier_catalog
        .transpose()
        .context("loading amplifier catalog")?;
    Ok((filter_catalog, amplifier_catalog))
}

fn join<T>(task: thread::ScopedJoinHandle<'_, T>) -> T {
    task.join().unwrap_or_else(|e| panic::resume_unwind(e))
}

/// Save a new configuration and print it
pub fn create<W: Write>(store: &ConfigStore, device: &Device, out: &mut W) -> Result<()> {
    let path = store.save(&device.snapshot())?;
    info!("Saved {} configuration to {}", device.model(), path.display());

    writeln!(out, "{}", device.describe_configuration())?;
    writeln!(out, "Saved to {}", path.display())?;
    Ok(())
}
