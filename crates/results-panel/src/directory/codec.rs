use std::io::{Read, Write};

use crate::metrics::import::clean_field;

use super::domain::{User, UserDraft};

pub const USER_EXPORT_HEADER: [&str; 3] = ["ZONA", "TELEFONE", "SENHA"];

/// Reads `zone, phone, password` lines; rows without a zone are dropped.
pub fn parse_users<R: Read>(reader: R) -> Result<Vec<UserDraft>, csv::Error> {
    let mut tsv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);
    let mut drafts = Vec::new();
    let mut first_row = true;

    for row in tsv_reader.byte_records() {
        let row = row?;
        let mut fields = row
            .iter()
            .map(|field| clean_field(&String::from_utf8_lossy(field)));
        let zone = fields.next().unwrap_or_default();
        let phone = fields.next().unwrap_or_default();
        let password = fields.next().unwrap_or_default();

        if zone.is_empty() && phone.is_empty() && password.is_empty() {
            continue;
        }
        if first_row {
            first_row = false;
            if zone.to_uppercase().starts_with(USER_EXPORT_HEADER[0]) {
                continue;
            }
        }
        if zone.is_empty() {
            continue;
        }

        drafts.push(UserDraft {
            zone,
            phone: Some(phone),
            password: Some(password),
        });
    }

    Ok(drafts)
}

/// Writes field users behind [`USER_EXPORT_HEADER`]; the password column stays empty.
pub fn write_users<W: Write>(writer: W, users: &[User]) -> Result<(), csv::Error> {
    let mut tsv_writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    tsv_writer.write_record(USER_EXPORT_HEADER)?;
    for user in users.iter().filter(|user| !user.is_admin()) {
        tsv_writer.write_record([user.zone.as_str(), user.phone.as_str(), ""])?;
    }

    tsv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_zoneless_rows_are_skipped() {
        let data = "Zona\tTelefone\tSenha\n\
NORTE001A\t5511\tabc\n\
\t5522\tdef\n\
\n\
SUL00001B\n";
        let drafts = parse_users(data.as_bytes()).expect("parse");
        let zones: Vec<_> = drafts.iter().map(|draft| draft.zone.as_str()).collect();
        assert_eq!(zones, vec!["NORTE001A", "SUL00001B"]);
        assert_eq!(drafts[0].password.as_deref(), Some("abc"));
        assert_eq!(drafts[1].phone.as_deref(), Some(""));
    }

    #[test]
    fn header_is_only_detected_on_the_first_row() {
        let data = "NORTE001A\t1\tx\nZONA9\t2\ty\n";
        let drafts = parse_users(data.as_bytes()).expect("parse");
        assert_eq!(drafts.len(), 2);
    }

    #[test]
    fn export_omits_admins_and_digests() {
        let users = vec![
            User::admin("1234"),
            User::field("NORTE001A", "5511", "secret"),
        ];
        let mut buffer = Vec::new();
        write_users(&mut buffer, &users).expect("write");
        let text = String::from_utf8(buffer).expect("utf-8");
        assert_eq!(text, "ZONA\tTELEFONE\tSENHA\nNORTE001A\t5511\t\n");
    }
}
