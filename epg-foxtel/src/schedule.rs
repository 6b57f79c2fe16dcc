//! Schedule reconstruction.
//!
//! Items only carry a start time. Each program's stop is the next program's
//! start; the last one gets [`FALLBACK_DURATION`]. When a start goes backwards
//! the listing has crossed midnight, so the start moves forward one day and the
//! date cursor advances. Later starts are shifted by the days already advanced,
//! which keeps one crossing from advancing the cursor more than once.
//!
//! Building happens in two steps so the markup (which is not `Send`) is gone
//! before any network await:
//!
//! 1. [`ScheduleBuilder`] folds fragments into a [`Draft`] synchronously.
//! 2. [`Draft::enrich`] fetches synopses, at most `concurrency` at a time,
//!    and keeps the original order.

use chrono::{Days, Duration, NaiveDate};
use futures::stream::{self, StreamExt};

use crate::decode::{self, ScheduleError};
use crate::detail::SynopsisFetcher;
use crate::fragment::Fragment;
use crate::program::{FALLBACK_DURATION, Program, Schedule};

struct Entry {
    program: Program,
    detail_href: Option<String>,
}

/// Accumulator threaded through one build: date cursor, days advanced so far,
/// and the programs decoded so far (the last one is the open "previous").
pub struct ScheduleBuilder {
    cursor: NaiveDate,
    offset_days: u64,
    entries: Vec<Entry>,
}

impl ScheduleBuilder {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            cursor: date,
            offset_days: 0,
            entries: Vec::new(),
        }
    }

    /// Date the listing is currently on.
    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    /// Decode one item and close the previous program.
    ///
    /// An item without a usable start, or one whose times cannot be
    /// represented, is rejected and leaves the builder untouched.
    pub fn push(&mut self, item: &impl Fragment) -> Result<(), ScheduleError> {
        let raw = decode::parse_start(item)?;
        let out_of_range = || ScheduleError::OutOfRange(raw.timestamp_millis());

        let mut start = raw
            .checked_add_signed(Duration::days(self.offset_days as i64))
            .ok_or_else(out_of_range)?;
        let rolled = self
            .entries
            .last()
            .is_some_and(|prev| start < prev.program.start);
        if rolled {
            start = start
                .checked_add_signed(Duration::days(1))
                .ok_or_else(out_of_range)?;
        }
        let stop = start
            .checked_add_signed(FALLBACK_DURATION)
            .ok_or_else(out_of_range)?;

        if rolled {
            self.offset_days += 1;
            self.cursor = self
                .cursor
                .checked_add_days(Days::new(1))
                .unwrap_or(self.cursor);
            tracing::debug!(cursor = %self.cursor, %start, "schedule.rollover");
        }
        if let Some(prev) = self.entries.last_mut() {
            prev.program.stop = start;
        }

        let program = Program {
            title: decode::parse_title(item),
            sub_title: decode::parse_sub_title(item),
            image: decode::parse_image(item),
            rating: decode::parse_rating(item),
            season: decode::parse_season(item),
            episode: decode::parse_episode(item),
            desc: None,
            start,
            stop,
        };
        self.entries.push(Entry {
            program,
            detail_href: decode::detail_href(item),
        });
        Ok(())
    }

    /// Push every item in order, skipping (and logging) items without a start.
    pub fn extend<F, I>(mut self, items: I) -> Self
    where
        F: Fragment,
        I: IntoIterator<Item = F>,
    {
        for (index, item) in items.into_iter().enumerate() {
            if let Err(e) = self.push(&item) {
                tracing::warn!(index, error = %e, "schedule.item_skipped");
            }
        }
        self
    }

    pub fn finish(self) -> Draft {
        Draft {
            date: self.cursor,
            entries: self.entries,
        }
    }
}

/// Programs with final start/stop times, still waiting for synopses.
pub struct Draft {
    date: NaiveDate,
    entries: Vec<Entry>,
}

impl Draft {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fill in `desc` for every item that links to a detail page.
    ///
    /// Items without a link never hit the network. A failed fetch leaves that
    /// one `desc` empty.
    pub async fn enrich(self, fetcher: &dyn SynopsisFetcher, concurrency: usize) -> Schedule {
        let hrefs: Vec<Option<String>> =
            self.entries.iter().map(|e| e.detail_href.clone()).collect();

        let descs: Vec<Option<String>> = stream::iter(hrefs)
            .map(|href| async move {
                match href {
                    Some(href) => fetcher.synopsis(&href).await,
                    None => None,
                }
            })
            .buffered(concurrency.max(1))
            .collect()
            .await;

        let programs = self
            .entries
            .into_iter()
            .zip(descs)
            .map(|(entry, desc)| Program {
                desc,
                ..entry.program
            })
            .collect();

        Schedule {
            date: self.date,
            programs,
        }
    }

    /// Finish without fetching any detail pages.
    pub fn into_schedule(self) -> Schedule {
        Schedule {
            date: self.date,
            programs: self.entries.into_iter().map(|e| e.program).collect(),
        }
    }
}

/// Build the full schedule for one listing: fold every item, then enrich.
pub async fn build_schedule<F: Fragment>(
    items: Vec<F>,
    date: NaiveDate,
    fetcher: &dyn SynopsisFetcher,
    concurrency: usize,
) -> Schedule {
    let draft = ScheduleBuilder::new(date).extend(items).finish();
    draft.enrich(fetcher, concurrency).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::HtmlFragment;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32, m: u32) -> i64 {
        Utc.with_ymd_and_hms(2024, 3, 9, h, m, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn item(start_ms: i64, title: &str) -> HtmlFragment {
        HtmlFragment::parse(&format!(
            r#"<a data-scheduled-date="{start_ms}"><div class="epg-event-description">{title}</div></a>"#
        ))
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn stops_chain_to_next_start() {
        let items = vec![item(at(18, 0), "A"), item(at(18, 30), "B"), item(at(19, 45), "C")];
        let schedule = ScheduleBuilder::new(d(9)).extend(items).finish().into_schedule();

        let p = &schedule.programs;
        assert_eq!(p.len(), 3);
        for pair in p.windows(2) {
            assert_eq!(pair[0].stop, pair[1].start);
        }
        assert_eq!(p[2].stop, p[2].start + Duration::minutes(30));
        assert_eq!(schedule.date, d(9));
    }

    #[test]
    fn midnight_rollover_advances_once() {
        let items = vec![item(at(23, 50), "A"), item(at(0, 10), "B"), item(at(0, 40), "C")];
        let mut builder = ScheduleBuilder::new(d(9));
        for i in &items {
            builder.push(i).unwrap();
        }
        assert_eq!(builder.cursor(), d(10));
        let schedule = builder.finish().into_schedule();

        let starts: Vec<_> = schedule.programs.iter().map(|p| p.start).collect();
        assert_eq!(
            starts,
            vec![
                Utc.with_ymd_and_hms(2024, 3, 9, 23, 50, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 10, 0, 10, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 10, 0, 40, 0).unwrap(),
            ]
        );
        assert_eq!(schedule.programs[0].stop, starts[1]);
        assert_eq!(schedule.programs[1].stop, starts[2]);
        assert_eq!(schedule.date, d(10));
    }

    #[test]
    fn already_absolute_next_day_does_not_roll() {
        let next_day = Utc
            .with_ymd_and_hms(2024, 3, 10, 0, 10, 0)
            .unwrap()
            .timestamp_millis();
        let items = vec![item(at(23, 50), "A"), item(next_day, "B")];
        let schedule = ScheduleBuilder::new(d(9)).extend(items).finish().into_schedule();
        assert_eq!(schedule.date, d(9));
        assert_eq!(schedule.programs[0].stop, schedule.programs[1].start);
    }

    #[test]
    fn out_of_order_glitch_still_rolls_over() {
        // Only the immediately previous start is consulted.
        let items = vec![item(at(20, 0), "A"), item(at(19, 0), "B")];
        let schedule = ScheduleBuilder::new(d(9)).extend(items).finish().into_schedule();
        assert_eq!(schedule.date, d(10));
        assert_eq!(
            schedule.programs[1].start,
            Utc.with_ymd_and_hms(2024, 3, 10, 19, 0, 0).unwrap()
        );
    }

    #[test]
    fn items_without_start_are_skipped() {
        let broken = HtmlFragment::parse(r#"<a><div class="epg-event-description">?</div></a>"#);
        let items = vec![item(at(18, 0), "A"), broken, item(at(19, 0), "C")];
        let schedule = ScheduleBuilder::new(d(9)).extend(items).finish().into_schedule();
        let titles: Vec<_> = schedule.programs.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert_eq!(schedule.programs[0].stop, schedule.programs[1].start);
    }

    #[test]
    fn unrepresentable_start_fails_only_that_item() {
        let last = DateTime::<Utc>::MAX_UTC.timestamp_millis();
        let mut builder = ScheduleBuilder::new(d(9));
        builder.push(&item(at(20, 0), "A")).unwrap();
        assert_eq!(
            builder.push(&item(last, "B")),
            Err(ScheduleError::OutOfRange(last))
        );
        assert_eq!(builder.cursor(), d(9));

        let items = vec![item(at(20, 0), "A"), item(last, "B"), item(at(21, 0), "C")];
        let schedule = ScheduleBuilder::new(d(9)).extend(items).finish().into_schedule();
        let titles: Vec<_> = schedule.programs.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert_eq!(schedule.programs[0].stop, schedule.programs[1].start);
        assert_eq!(schedule.date, d(9));
    }

    #[test]
    fn empty_input_builds_empty_schedule() {
        let schedule = ScheduleBuilder::new(d(9))
            .extend(Vec::<HtmlFragment>::new())
            .finish()
            .into_schedule();
        assert!(schedule.is_empty());
        assert_eq!(schedule.date, d(9));
    }
}
