use clap::Parser;

/// Prints one answer sheet (PDF) per respondent of a survey.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, default data.xlsx) The Excel file with the responses. The first row is the header and
    /// must contain a 'Zaman damgası' column with the time of each response.
    #[clap(short, long, value_parser, default_value = "data.xlsx")]
    pub input: String,

    /// (file path, default questions.json) The JSON list of questions to print on every sheet.
    #[clap(short, long, value_parser, default_value = "questions.json")]
    pub questions: String,

    /// (directory, default current directory) Where the <number>_cevaplar.pdf files are written.
    #[clap(short, long, value_parser, default_value = ".")]
    pub out_dir: String,

    /// (file path, default DejaVuSans.ttf) A TrueType font covering the star and box symbols.
    /// If it cannot be read, a built-in font is used instead.
    #[clap(long, value_parser, default_value = "DejaVuSans.ttf")]
    pub font: String,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
