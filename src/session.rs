use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Instant;

use crate::loader;
use crate::models::{Dataset, Filters};
use crate::pager;
use crate::prompt::{self, Console};
use crate::report::{self, Section, RULE};

/// The active filters and the dataset they produced, shared read-only by
/// every report section of one cycle.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub filters: Filters,
    pub dataset: Dataset,
}

impl ReportContext {
    pub fn new(filters: Filters, dataset: Dataset) -> Self {
        Self { filters, dataset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Restart,
    Exit,
}

/// One pass of prompt, load, reports and raw data, ending with the restart question.
pub fn run_cycle<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    data_dir: &Path,
) -> anyhow::Result<Next> {
    let filters = prompt::get_filters(console)?;

    if let Some(context) = load_context(console, data_dir, filters)? {
        for section in Section::ALL {
            run_section(console, &context, section)?;
        }
        pager::show_raw_data(console, &context.dataset)?;
    }

    if console.confirm("\nWould you like to start again? (y/n)\n")? {
        Ok(Next::Restart)
    } else {
        console.say("See ya!")?;
        Ok(Next::Exit)
    }
}

fn load_context<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    data_dir: &Path,
    filters: Filters,
) -> anyhow::Result<Option<ReportContext>> {
    let started = Instant::now();
    console.say(&format!(
        "\nGreat! Loading data with these filters:\nCity: {}\nMonth: {}\nWeekday: {}",
        filters.city.title,
        filters.month_label(),
        filters.weekday_label()
    ))?;

    match loader::load(data_dir, &filters) {
        Ok(dataset) => {
            console.say(&format!(
                "\nThis took {} seconds to load.",
                started.elapsed().as_secs_f64()
            ))?;
            console.say(RULE)?;
            Ok(Some(ReportContext::new(filters, dataset)))
        }
        Err(err) => {
            log::error!("load failed for {}: {err:#}", filters.city.title);
            console.say(&format!(
                "\nUnable to load data for {}: {err:#}",
                filters.city.title
            ))?;
            Ok(None)
        }
    }
}

fn run_section<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    context: &ReportContext,
    section: Section,
) -> anyhow::Result<()> {
    let intro = report::section_intro(&context.filters, section.topic());
    console.ask(&format!("{intro} (press ENTER to continue)"))?;

    let started = Instant::now();
    let body = section.render(context);
    let elapsed = started.elapsed().as_secs_f64();
    log::debug!("{section:?} took {elapsed}s");

    console.print(&body)?;
    console.say(&format!("\nThis took {elapsed} seconds to calculate."))?;
    console.say(RULE)?;
    Ok(())
}
