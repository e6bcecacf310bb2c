use crate::infra::{InMemoryMetricStore, InMemoryParameterStore};
use clap::{Args, ValueEnum};
use results_panel::error::AppError;
use results_panel::metrics::{
    format_percent, CategoryOrder, Indicator, PanelService, PeriodFilter, PivotView, RankMode,
    RankingView, ResultsView, Selector, SystemParameters, TargetStatus,
    DEFAULT_EFFECTIVENESS_WEIGHT, DEFAULT_PRODUCTIVITY_WEIGHT,
};
use std::fmt::Write as _;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

const ZONE_WIDTH: usize = 14;
const CELL_WIDTH: usize = 9;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Productivity TSV export
    #[arg(long)]
    pub(crate) productivity: PathBuf,
    /// Effectiveness TSV export
    #[arg(long)]
    pub(crate) effectiveness: PathBuf,
    /// Area the report is scoped to
    #[arg(long)]
    pub(crate) area: String,
    /// Month to report on (defaults to all)
    #[arg(long)]
    pub(crate) month: Option<String>,
    /// Week to report on (defaults to all)
    #[arg(long)]
    pub(crate) week: Option<String>,
    /// Productivity weight of the composite, in percent
    #[arg(long, default_value_t = DEFAULT_PRODUCTIVITY_WEIGHT)]
    pub(crate) prod_weight: f64,
    /// Effectiveness weight of the composite, in percent
    #[arg(long, default_value_t = DEFAULT_EFFECTIVENESS_WEIGHT)]
    pub(crate) eff_weight: f64,
    /// Productivity target, in percent
    #[arg(long, default_value_t = 0.0)]
    pub(crate) prod_target: f64,
    /// Effectiveness target, in percent
    #[arg(long, default_value_t = 0.0)]
    pub(crate) eff_target: f64,
    /// How tied zones are ranked
    #[arg(long, value_enum, default_value_t = RankArg::Ordinal)]
    pub(crate) ranks: RankArg,
    /// Sort pivot categories as plain text
    #[arg(long)]
    pub(crate) lexicographic: bool,
}

impl ReportArgs {
    fn parameters(&self) -> SystemParameters {
        SystemParameters {
            productivity_target: self.prod_target,
            effectiveness_target: self.eff_target,
            productivity_weight: self.prod_weight,
            effectiveness_weight: self.eff_weight,
            ..SystemParameters::default()
        }
    }

    fn filter(&self) -> PeriodFilter {
        PeriodFilter::new(
            self.area.clone(),
            Selector::from(self.month.clone()),
            Selector::from(self.week.clone()),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RankArg {
    /// Ties broken by zone name
    Ordinal,
    /// Ties share a rank, the next one skips ahead
    Shared,
    /// Ties share a rank, no gaps
    Dense,
}

impl From<RankArg> for RankMode {
    fn from(value: RankArg) -> Self {
        match value {
            RankArg::Ordinal => RankMode::Ordinal,
            RankArg::Shared => RankMode::Shared,
            RankArg::Dense => RankMode::Dense,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReportView {
    Pivot,
    Ranking,
}

pub(crate) fn run_report(args: ReportArgs, view: ReportView) -> Result<(), AppError> {
    let service = PanelService::new(
        Arc::new(InMemoryMetricStore::default()),
        Arc::new(InMemoryParameterStore::default()),
    );
    service.import_tsv(Indicator::Productivity, File::open(&args.productivity)?)?;
    service.import_tsv(Indicator::Effectiveness, File::open(&args.effectiveness)?)?;
    service.update_parameters(args.parameters())?;

    let rendered = match view {
        ReportView::Pivot => {
            let order = if args.lexicographic {
                CategoryOrder::Lexicographic
            } else {
                CategoryOrder::Numeric
            };
            render_results(&service.results(args.filter(), order)?)
        }
        ReportView::Ranking => {
            render_ranking(&service.ranking(args.filter(), args.ranks.into())?)
        }
    };

    print!("{rendered}");
    Ok(())
}

fn status_marker(status: TargetStatus) -> char {
    match status {
        TargetStatus::OnTarget => '+',
        TargetStatus::BelowTarget => '!',
        TargetStatus::Neutral => ' ',
    }
}

pub(crate) fn render_results(view: &ResultsView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Area {} | month {} | week {} | last update {}",
        view.filter.area, view.filter.month, view.filter.week, view.last_updated
    );
    render_pivot(&mut out, &view.productivity);
    render_pivot(&mut out, &view.effectiveness);
    out
}

fn render_pivot(out: &mut String, pivot: &PivotView) {
    let _ = writeln!(out, "\n{} (target {})", pivot.title, format_percent(pivot.target));
    if pivot.rows.is_empty() {
        let _ = writeln!(out, "No data for the selected filters.");
        return;
    }

    let _ = write!(out, "{:<ZONE_WIDTH$}", "ZONE");
    for category in &pivot.categories {
        let _ = write!(out, "{:>CELL_WIDTH$}", category);
    }
    out.push('\n');

    for row in &pivot.rows {
        let _ = write!(out, "{:<ZONE_WIDTH$}", row.zone);
        for cell in &row.cells {
            let text = match cell {
                Some(cell) => format!("{}{}", cell.result_text, status_marker(cell.status)),
                None => "-".to_string(),
            };
            let _ = write!(out, "{:>CELL_WIDTH$}", text);
        }
        out.push('\n');
    }
}

pub(crate) fn render_ranking(view: &RankingView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Ranking {} | month {} | week {} | weights {:.0}/{:.0} | composite target {}",
        view.filter.area,
        view.filter.month,
        view.filter.week,
        view.weights.productivity,
        view.weights.effectiveness,
        format_percent(view.composite_target)
    );
    if view.rows.is_empty() {
        let _ = writeln!(out, "No data for the selected filters.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<ZONE_WIDTH$}{:>CELL_WIDTH$}{:>4}{:>CELL_WIDTH$}{:>4}{:>CELL_WIDTH$}{:>4}",
        "ZONE", "PROD", "#", "EFF", "#", "COMP", "#"
    );
    for row in &view.rows {
        let zone = if row.podium {
            format!("*{}", row.aggregate.zone)
        } else {
            format!(" {}", row.aggregate.zone)
        };
        let _ = writeln!(
            out,
            "{:<ZONE_WIDTH$}{:>CELL_WIDTH$}{:>4}{:>CELL_WIDTH$}{:>4}{:>CELL_WIDTH$}{:>4}{}",
            zone,
            format_percent(row.aggregate.productivity_percent),
            row.aggregate.productivity_rank,
            format_percent(row.aggregate.effectiveness_percent),
            row.aggregate.effectiveness_rank,
            format_percent(row.aggregate.composite_percent),
            row.aggregate.composite_rank,
            status_marker(row.composite_status),
        );
    }

    let totals = &view.totals;
    let _ = writeln!(
        out,
        "{:<ZONE_WIDTH$}{:>CELL_WIDTH$}{:>4}{:>CELL_WIDTH$}{:>4}{:>CELL_WIDTH$}{:>4}{}",
        " TV",
        format_percent(totals.totals.productivity),
        "",
        format_percent(totals.totals.effectiveness),
        "",
        format_percent(totals.totals.composite),
        "",
        status_marker(totals.composite_status),
    );
    out
}
