//! Supported Stack Overflow developer survey editions

use crate::{
    layout::{Layout, RunEnd},
    Year,
};

/// What we know about one yearly survey edition
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Edition {
    /// Year of the survey
    pub year: Year,

    /// Where the zipped survey results can be downloaded
    pub url: &'static str,

    /// Path of the survey results within the zip archive
    pub archive_path: &'static str,

    /// Where the language question is stored in the survey results
    pub layout: Layout,
}

/// Legacy question label shared by the 2013 and 2014 editions
const USED_SIGNIFICANTLY: &str =
    "Which of the following languages or technologies have you used significantly in the past year?";

/// Legacy question label shared by the 2011 and 2012 editions
const PROFICIENT_IN: &str = "Which languages are you proficient in?";

/// Every survey edition supported by this program, in chronological order
pub fn supported_editions() -> &'static [Edition] {
    static EDITIONS: [Edition; 10] = [
        Edition {
            year: 2011,
            url: "https://drive.google.com/uc?export=download&id=0Bx0LyhBTBZQgUGVYaGx3SzdUQ1U",
            archive_path: "2011 Stack Overflow Survey Results.csv",
            layout: Layout::IndicatorColumnRun {
                start: PROFICIENT_IN,
                end: RunEnd::Placeholders,
            },
        },
        Edition {
            year: 2012,
            url: "https://drive.google.com/uc?export=download&id=0B0DL28AqnGsrX3JaZWVwWEpHNWM",
            archive_path: "2012 Stack Overflow Survey Results.csv",
            layout: Layout::IndicatorColumnRun {
                start: PROFICIENT_IN,
                end: RunEnd::Placeholders,
            },
        },
        Edition {
            year: 2013,
            url: "https://drive.google.com/uc?export=download&id=0B0DL28AqnGsrenpPNTc5UE1PYW8",
            archive_path: "2013 Stack Overflow Survey Responses.csv",
            layout: Layout::IndicatorColumnRun {
                start: USED_SIGNIFICANTLY,
                end: RunEnd::Placeholders,
            },
        },
        Edition {
            year: 2014,
            url: "https://drive.google.com/uc?export=download&id=0B0DL28AqnGsrempjMktvWFNaQzA",
            archive_path: "2014 Stack Overflow Survey Responses.csv",
            layout: Layout::IndicatorColumnRun {
                start: USED_SIGNIFICANTLY,
                end: RunEnd::Placeholders,
            },
        },
        Edition {
            year: 2015,
            url: "https://drive.google.com/uc?export=download&id=0B0DL28AqnGsra1psanV1MEdxZk0",
            archive_path: "2015 Stack Overflow Developer Survey Responses.csv",
            layout: Layout::IndicatorColumnRun {
                start: "Select all that apply",
                end: RunEnd::Placeholders,
            },
        },
        Edition {
            year: 2016,
            url: "https://drive.google.com/uc?export=download&id=0B0DL28AqnGsrV0VldnVIT1hyb0E",
            archive_path: "2016 Stack Overflow Survey Results/2016 Stack Overflow Survey Responses.csv",
            layout: Layout::DelimitedColumn { name: "tech_do" },
        },
        Edition {
            year: 2017,
            url: "https://drive.google.com/uc?export=download&id=0B6ZlG_Eygdj-c1kzcmUxN05VUXM",
            archive_path: "survey_results_public.csv",
            layout: Layout::DelimitedColumn {
                name: "HaveWorkedLanguage",
            },
        },
        Edition {
            year: 2018,
            url: "https://drive.google.com/uc?export=download&id=1_9On2-nsBQIw3JiY43sWbrF8EjrqrR4U",
            archive_path: "survey_results_public.csv",
            layout: Layout::DelimitedColumn {
                name: "LanguageWorkedWith",
            },
        },
        Edition {
            year: 2019,
            url: "https://drive.google.com/uc?export=download&id=1QOmVDpd8hcVYqqUXDXf68UMDWQZP0wQV",
            archive_path: "survey_results_public.csv",
            layout: Layout::DelimitedColumn {
                name: "LanguageWorkedWith",
            },
        },
        Edition {
            year: 2020,
            url: "https://drive.google.com/uc?export=download&id=1dfGerWeWkcyQ9GX9x20rdSGj7WtEpzBB",
            archive_path: "survey_results_public.csv",
            layout: Layout::DelimitedColumn {
                name: "LanguageWorkedWith",
            },
        },
    ];
    &EDITIONS
}
