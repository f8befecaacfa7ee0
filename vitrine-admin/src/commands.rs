use std::path::PathBuf;

use vitrine_blob::Bucket;
use vitrine_core::VitrineError;

pub const USAGE: &str = "\
usage: vitrine-admin <command>

  check  <bucket> <file>               validate a file against the bucket policy
  upload <bucket> <file> [--path KEY]  validate and upload a file
  list   <bucket> [FOLDER]             list up to 100 objects
  delete <bucket> <path>               delete one object
  url    <bucket> <path>               print the public URL of an object

buckets: images, media, documents";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Check { bucket: Bucket, file: PathBuf },
    Upload { bucket: Bucket, file: PathBuf, path: Option<String> },
    List { bucket: Bucket, folder: Option<String> },
    Delete { bucket: Bucket, path: String },
    Url { bucket: Bucket, path: String },
}

fn usage_error(message: impl std::fmt::Display) -> anyhow::Error {
    VitrineError::bad_request(format!("{message}\n\n{USAGE}")).into_anyhow()
}

fn bucket_arg(raw: Option<String>) -> anyhow::Result<Bucket> {
    let raw = raw.ok_or_else(|| usage_error("missing <bucket>"))?;
    raw.parse::<Bucket>().map_err(usage_error)
}

fn required(raw: Option<String>, name: &str) -> anyhow::Result<String> {
    raw.ok_or_else(|| usage_error(format!("missing <{name}>")))
}

impl Command {
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let name = args.next().ok_or_else(|| usage_error("missing command"))?;

        let command = match name.as_str() {
            "check" => Command::Check {
                bucket: bucket_arg(args.next())?,
                file: required(args.next(), "file")?.into(),
            },
            "upload" => {
                let bucket = bucket_arg(args.next())?;
                let file = required(args.next(), "file")?.into();
                let path = match args.next().as_deref() {
                    None => None,
                    Some("--path") => Some(required(args.next(), "KEY")?),
                    Some(other) => return Err(usage_error(format!("unexpected argument: {other}"))),
                };
                Command::Upload { bucket, file, path }
            }
            "list" => Command::List {
                bucket: bucket_arg(args.next())?,
                folder: args.next(),
            },
            "delete" => Command::Delete {
                bucket: bucket_arg(args.next())?,
                path: required(args.next(), "path")?,
            },
            "url" => Command::Url {
                bucket: bucket_arg(args.next())?,
                path: required(args.next(), "path")?,
            },
            other => return Err(usage_error(format!("unknown command: {other}"))),
        };

        if let Some(extra) = args.next() {
            return Err(usage_error(format!("unexpected argument: {extra}")));
        }
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> anyhow::Result<Command> {
        Command::parse(line.split_whitespace().map(String::from))
    }

    #[test]
    fn upload_with_explicit_path() {
        assert_eq!(
            parse("upload images ./logo.png --path partners/logo.png").unwrap(),
            Command::Upload {
                bucket: Bucket::Images,
                file: PathBuf::from("./logo.png"),
                path: Some("partners/logo.png".into()),
            }
        );
    }

    #[test]
    fn list_folder_is_optional() {
        assert_eq!(
            parse("list media").unwrap(),
            Command::List {
                bucket: Bucket::Media,
                folder: None,
            }
        );
    }

    #[test]
    fn unknown_bucket_is_a_bad_request() {
        let err = parse("url avatars a.png").unwrap_err();
        let vitrine = VitrineError::normalize(err);
        assert_eq!(vitrine.kind, vitrine_core::ErrorKind::BadRequest);
        assert!(vitrine.message.contains("avatars"));
    }

    #[test]
    fn trailing_arguments_are_rejected() {
        assert!(parse("delete documents a.pdf b.pdf").is_err());
        assert!(parse("").is_err());
    }
}
