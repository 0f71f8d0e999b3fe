//! Draft file migration.

use crate::DraftError;
use crate::schema::DraftFile;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut file: DraftFile) -> Result<DraftFile, DraftError> {
    while file.version < LATEST_VERSION {
        file = migrate_one_version(file)?;
    }
    Ok(file)
}

fn migrate_one_version(file: DraftFile) -> Result<DraftFile, DraftError> {
    match file.version {
        0 => migrate_v0_to_v1(file),
        v => Err(DraftError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 drafts predate the layout form field and always meant I-Form.
fn migrate_v0_to_v1(mut file: DraftFile) -> Result<DraftFile, DraftError> {
    if file.draft.layout_form.is_none() {
        file.draft.layout_form = Some(cf_length::LayoutForm::I);
    }
    file.version = 1;
    tracing::debug!("migrated draft file from version 0 to 1");
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ConfigurationDraft;
    use cf_length::LayoutForm;

    #[test]
    fn v0_gains_layout_form() {
        let file = DraftFile {
            version: 0,
            draft: ConfigurationDraft::default(),
        };
        let migrated = migrate_to_latest(file).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        assert_eq!(migrated.draft.layout_form, Some(LayoutForm::I));
    }

    #[test]
    fn latest_is_untouched() {
        let file = DraftFile {
            version: LATEST_VERSION,
            draft: ConfigurationDraft::default(),
        };
        let migrated = migrate_to_latest(file.clone()).unwrap();
        assert_eq!(migrated, file);
    }
}
