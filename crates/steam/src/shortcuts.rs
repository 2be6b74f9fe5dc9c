use crc32fast::Hasher;

use crate::paths::Paths;
use crate::vdf::{VDF_TYPE_END, VDF_TYPE_INT32, VDF_TYPE_OBJECT, VDF_TYPE_STRING};

/// A non-Steam shortcut ready to be written into shortcuts.vdf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub app_id: u32,
    pub name: String,
    pub exe: String,
    pub start_dir: String,
    pub icon: String,
}

impl Shortcut {
    /// Builds a shortcut for `user_id`, deriving the app id and the icon path
    /// inside that user's grid directory.
    pub fn for_user(
        paths: &Paths,
        user_id: &str,
        name: &str,
        exe: &str,
        start_dir: &str,
    ) -> Self {
        let app_id = compute_app_id(name, exe);
        let icon = paths
            .icon_path(user_id, app_id)
            .to_string_lossy()
            .into_owned();
        Self {
            app_id,
            name: name.to_string(),
            exe: exe.to_string(),
            start_dir: start_dir.to_string(),
            icon,
        }
    }
}

/// Generates a Steam shortcut app ID from the display name and executable.
///
/// Matches the id Steam derives for grid artwork lookups:
/// `CRC32(name + exe) | 0x80000000`.
pub fn compute_app_id(name: &str, exe: &str) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    hasher.update(exe.as_bytes());
    hasher.finalize() | 0x8000_0000
}

/// Serializes one shortcut as a binary VDF entry keyed by `index`.
///
/// Field order and key spelling follow what Steam itself writes:
/// `appid`, `appname`, `exe`, `StartDir`, `icon`. Strings are written
/// verbatim; an embedded NUL would end the field early.
pub fn build_record(index: u32, shortcut: &Shortcut) -> Vec<u8> {
    let mut data = Vec::new();

    // Entry: \x00 "<index>" \x00
    data.push(VDF_TYPE_OBJECT);
    write_cstr(&mut data, &index.to_string());

    data.push(VDF_TYPE_INT32);
    write_cstr(&mut data, "appid");
    data.extend_from_slice(&shortcut.app_id.to_le_bytes());

    write_string_field(&mut data, "appname", &shortcut.name);
    write_string_field(&mut data, "exe", &shortcut.exe);
    write_string_field(&mut data, "StartDir", &shortcut.start_dir);
    write_string_field(&mut data, "icon", &shortcut.icon);

    data.push(VDF_TYPE_END);
    data
}

fn write_string_field(data: &mut Vec<u8>, key: &str, value: &str) {
    data.push(VDF_TYPE_STRING);
    write_cstr(data, key);
    write_cstr(data, value);
}

/// Writes a null-terminated string.
fn write_cstr(data: &mut Vec<u8>, s: &str) {
    data.extend_from_slice(s.as_bytes());
    data.push(0x00);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Shortcut {
        Shortcut {
            app_id: 0xDEAD_BEEF,
            name: "Game".into(),
            exe: "/bin/g".into(),
            start_dir: "/home".into(),
            icon: "/grid/1_icon.ico".into(),
        }
    }

    #[test]
    fn compute_app_id_deterministic() {
        let id1 = compute_app_id("My Game", "/usr/bin/game");
        let id2 = compute_app_id("My Game", "/usr/bin/game");
        assert_eq!(id1, id2);
    }

    #[test]
    fn compute_app_id_high_bit_set() {
        for (name, exe) in [("", ""), ("Test", "/bin/test"), ("Ünïcødé", "/opt/ü")] {
            assert_ne!(compute_app_id(name, exe) & 0x8000_0000, 0, "{name:?} {exe:?}");
        }
    }

    #[test]
    fn compute_app_id_known_values() {
        // CRC32 of the empty string is 0.
        assert_eq!(compute_app_id("", ""), 0x8000_0000);
        assert_eq!(
            compute_app_id("The quick brown fox ", "jumps over the lazy dog"),
            0xC14F_A339
        );
        assert_eq!(
            compute_app_id("Minecraft Splitscreen", "/x/run.sh"),
            3_936_777_386
        );
    }

    #[test]
    fn compute_app_id_depends_on_concatenation_only() {
        assert_eq!(compute_app_id("ab", "c"), compute_app_id("a", "bc"));
        assert_ne!(compute_app_id("Game A", "/bin/a"), compute_app_id("Game B", "/bin/b"));
    }

    #[test]
    fn build_record_exact_layout() {
        let rec = build_record(3, &sample());

        let mut expected = Vec::new();
        expected.extend_from_slice(b"\x003\x00");
        expected.extend_from_slice(b"\x02appid\x00");
        expected.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        expected.extend_from_slice(b"\x01appname\x00Game\x00");
        expected.extend_from_slice(b"\x01exe\x00/bin/g\x00");
        expected.extend_from_slice(b"\x01StartDir\x00/home\x00");
        expected.extend_from_slice(b"\x01icon\x00/grid/1_icon.ico\x00");
        expected.push(0x08);

        assert_eq!(rec, expected);
    }

    #[test]
    fn build_record_multi_digit_index() {
        let rec = build_record(127, &sample());
        assert!(rec.starts_with(b"\x00127\x00\x02appid\x00"));
        assert_eq!(rec.last(), Some(&0x08));
    }

    #[test]
    fn shortcut_for_user_derives_icon() {
        let paths = Paths::with_base("/steam");
        let sc = Shortcut::for_user(&paths, "42", "Minecraft Splitscreen", "/x/run.sh", "/x");
        assert_eq!(sc.app_id, compute_app_id("Minecraft Splitscreen", "/x/run.sh"));
        assert_eq!(
            sc.icon,
            format!("/steam/userdata/42/config/grid/{}_icon.ico", sc.app_id)
        );
        assert_eq!(sc.start_dir, "/x");
    }
}
