//! STORED AS file formats

use crate::error::DriftError;
use crate::util::trim_quotes;

/// File formats accepted by `STORED AS <keyword>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    TextFile,
    Parquet,
    SequenceFile,
    RcFile,
    Orc,
    Avro,
}

impl FileFormat {
    pub const ALL: [FileFormat; 6] = [
        FileFormat::TextFile,
        FileFormat::Parquet,
        FileFormat::SequenceFile,
        FileFormat::RcFile,
        FileFormat::Orc,
        FileFormat::Avro,
    ];

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "textfile" => Some(FileFormat::TextFile),
            "parquet" => Some(FileFormat::Parquet),
            "sequencefile" => Some(FileFormat::SequenceFile),
            "rcfile" => Some(FileFormat::RcFile),
            "orc" => Some(FileFormat::Orc),
            "avro" => Some(FileFormat::Avro),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            FileFormat::TextFile => "textfile",
            FileFormat::Parquet => "parquet",
            FileFormat::SequenceFile => "sequencefile",
            FileFormat::RcFile => "rcfile",
            FileFormat::Orc => "orc",
            FileFormat::Avro => "avro",
        }
    }

    /// Lower-cased input format class the catalog records for this format
    pub fn input_format(&self) -> &'static str {
        match self {
            FileFormat::TextFile => "org.apache.hadoop.mapred.textinputformat",
            FileFormat::Parquet => "org.apache.hadoop.hive.ql.io.parquet.mapredparquetinputformat",
            FileFormat::SequenceFile => "org.apache.hadoop.mapred.sequencefileinputformat",
            FileFormat::RcFile => "org.apache.hadoop.hive.ql.io.rcfileinputformat",
            FileFormat::Orc => "org.apache.hadoop.hive.ql.io.orc.orcinputformat",
            FileFormat::Avro => "org.apache.hadoop.hive.ql.io.avro.avrocontainerinputformat",
        }
    }

    /// Reverse lookup from a lower-cased catalog input format.
    pub fn from_input_format(input_format: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.input_format() == input_format)
    }
}

/// Value of a STORED AS clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredAs {
    Named(FileFormat),
    /// `STORED AS INPUTFORMAT '...' [OUTPUTFORMAT '...']`
    Explicit {
        input_format: String,
        output_format: Option<String>,
    },
}

/// Parse the value of a STORED AS segment (text after `stored as`).
pub fn parse_stored_as(value: &str) -> Result<StoredAs, DriftError> {
    let value = value.trim();

    if let Some(format) = FileFormat::from_keyword(value) {
        return Ok(StoredAs::Named(format));
    }

    if value.starts_with("inputformat") {
        let tokens: Vec<&str> = value.split_whitespace().collect();
        let input_format = tokens.get(1).map(|t| trim_quotes(t).to_string());
        let output_format = match (tokens.get(2), tokens.get(3)) {
            (Some(&"outputformat"), Some(output)) => Some(trim_quotes(output).to_string()),
            _ => None,
        };
        if let Some(input_format) = input_format {
            return Ok(StoredAs::Explicit {
                input_format,
                output_format,
            });
        }
    }

    Err(DriftError::UnsupportedConstruct {
        clause: "STORED AS",
        value: value.to_string(),
    })
}
