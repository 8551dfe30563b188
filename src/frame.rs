use crate::task::Task;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn date_from_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

fn date_series(name: &'static str, dates: impl Iterator<Item = NaiveDate>) -> PolarsResult<Series> {
    let days: Vec<i32> = dates.map(date_to_days).collect();
    Series::new(PlSmallStr::from_static(name), days).cast(&DataType::Date)
}

fn optional_str_series<'a>(
    name: &'static str,
    values: impl Iterator<Item = Option<&'a str>>,
) -> Series {
    let data: Vec<Option<&str>> = values.collect();
    Series::new(PlSmallStr::from_static(name), data)
}

/// One row per task; `start`/`end` are `Date` typed and `dependencies` is a
/// list of ids.
pub fn tasks_to_dataframe(tasks: &[Task]) -> PolarsResult<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(12);

    let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    columns.push(Series::new(PlSmallStr::from_static("id"), ids).into_column());

    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    columns.push(Series::new(PlSmallStr::from_static("name"), names).into_column());

    columns.push(date_series("start", tasks.iter().map(|t| t.start))?.into_column());
    columns.push(date_series("end", tasks.iter().map(|t| t.end))?.into_column());

    let progress: Vec<i32> = tasks.iter().map(|t| i32::from(t.progress)).collect();
    columns.push(Series::new(PlSmallStr::from_static("progress"), progress).into_column());

    let status: Vec<&str> = tasks.iter().map(|t| t.status_class.as_str()).collect();
    columns.push(Series::new(PlSmallStr::from_static("status_class"), status).into_column());

    let kinds: Vec<&str> = tasks.iter().map(|t| t.kind.as_str()).collect();
    columns.push(Series::new(PlSmallStr::from_static("kind"), kinds).into_column());

    let dependencies: Vec<Series> = tasks
        .iter()
        .map(|t| {
            let inner: Vec<&str> = t.dependencies.iter().map(String::as_str).collect();
            Series::new(PlSmallStr::from_static(""), inner)
        })
        .collect();
    columns.push(
        Series::new(PlSmallStr::from_static("dependencies"), dependencies).into_column(),
    );

    let levels: Vec<Option<i32>> = tasks
        .iter()
        .map(|t| t.organization_level().map(i32::from))
        .collect();
    columns.push(Series::new(PlSmallStr::from_static("organization_level"), levels).into_column());

    columns.push(
        optional_str_series(
            "organization_type",
            tasks.iter().map(|t| t.organization_type().map(|o| o.as_str())),
        )
        .into_column(),
    );
    columns.push(
        optional_str_series("report_to", tasks.iter().map(Task::report_to)).into_column(),
    );
    columns.push(optional_str_series("color", tasks.iter().map(Task::color)).into_column());

    DataFrame::new(columns)
}
