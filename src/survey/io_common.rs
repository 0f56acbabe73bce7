use std::path::{Path, PathBuf};

/// The name of the answer sheet of a respondent, e.g. `3_cevaplar.pdf`.
pub fn output_file_name(person_number: usize) -> String {
    format!("{}_cevaplar.pdf", person_number)
}

pub fn output_path(out_dir: &Path, person_number: usize) -> PathBuf {
    out_dir.join(output_file_name(person_number))
}

pub fn document_title(person_number: usize) -> String {
    format!("Kişi {} cevaplar", person_number)
}
