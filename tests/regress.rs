use std::fs;
use std::path::Path;

use clap::App;
use indicatif::ProgressBar;
use rayon::ThreadPoolBuilder;
use rust_htslib::bam;
use rust_htslib::bam::header::HeaderRecord;
use rust_htslib::bam::record::Cigar::*;
use rust_htslib::bam::record::{Cigar, CigarString};
use tempfile::TempDir;

use minorfreq::cli;
use minorfreq::cli::shared::args::CoreArgs;
use minorfreq::core::error::MinorError;

const TMP_CREATE_ERROR: &str = "Failed to create temporary folder";
const BAM_WRITE_ERROR: &str = "Failed to write test BAM file";
const THREAD_POOL_ERROR: &str = "Failed to initialize thread pool";

const CONTIG: &str = "MN908947.3";
const CONTIGS: [(&str, u64); 2] = [(CONTIG, 20), ("other", 5)];

#[allow(non_camel_case_types)]
enum SubCommand {
    minor,
    basecnt,
}

fn run(args: &[&str], launch: SubCommand) -> Result<(), MinorError> {
    let factory = ProgressBar::hidden;

    let app = match launch {
        SubCommand::minor => cli::minor::args(),
        SubCommand::basecnt => cli::basecnt::args(),
    };
    let app = App::new("test").args(app);
    let matches = app.get_matches_from(args);

    let core = CoreArgs::new(&matches, factory)?;
    let pool = ThreadPoolBuilder::new().num_threads(core.threads).build().expect(THREAD_POOL_ERROR);
    match launch {
        SubCommand::minor => {
            let args = cli::minor::MinorArgs::new(&core, &matches, &factory)?;
            pool.install(|| cli::minor::run(core, args, factory()))
        }
        SubCommand::basecnt => {
            let args = cli::basecnt::BaseCntArgs::new(&core, &matches, &factory)?;
            pool.install(|| cli::basecnt::run(core, args, factory()))
        }
    }
}

type Alignment<'a> = (i64, &'a str, Vec<Cigar>);

// Coordinate-sorted reads against the first contig. CRAM files are encoded against the reference.
fn alignments(path: &Path, contigs: &[(&str, u64)], reference: Option<&str>, reads: &[Alignment]) -> String {
    let mut header = bam::Header::new();
    for (contig, length) in contigs {
        let mut record = HeaderRecord::new(b"SQ");
        record.push_tag(b"SN", contig);
        record.push_tag(b"LN", length);
        header.push_record(&record);
    }

    let format = if reference.is_some() { bam::Format::Cram } else { bam::Format::Bam };
    {
        let mut writer = bam::Writer::from_path(path, &header, format).expect(BAM_WRITE_ERROR);
        if let Some(fasta) = reference {
            writer.set_reference(fasta).expect(BAM_WRITE_ERROR);
        }
        for (ind, (pos, seq, cigar)) in reads.iter().enumerate() {
            let qname = format!("read-{}", ind);
            let qual = vec![30u8; seq.len()];
            let mut record = bam::Record::new();
            record.set(qname.as_bytes(), Some(&CigarString(cigar.clone())), seq.as_bytes(), &qual);
            record.set_flags(0);
            record.set_tid(0);
            record.set_pos(*pos);
            record.set_mapq(60);
            writer.write(&record).expect(BAM_WRITE_ERROR);
        }
    }
    bam::index::build(path, None, bam::index::Type::Bai, 1).expect(BAM_WRITE_ERROR);
    path.to_str().unwrap().to_owned()
}

fn bam(dir: &Path, name: &str, reads: &[Alignment]) -> String {
    alignments(&dir.join(format!("{}.bam", name)), &CONTIGS, None, reads)
}

// Sequences are repeated ACGT, each record is indexed with the .fai
fn fasta(dir: &Path, records: &[(&str, usize)]) -> String {
    let path = dir.join("reference.fasta");
    let (mut fasta, mut fai) = (String::new(), String::new());
    for (name, length) in records {
        let header = format!(">{}\n", name);
        let offset = fasta.len() + header.len();
        fai.push_str(&format!("{}\t{}\t{}\t{}\t{}\n", name, length, offset, length, length + 1));
        fasta.push_str(&header);
        fasta.push_str(&"ACGT".repeat(length / 4 + 1)[..*length]);
        fasta.push('\n');
    }
    fs::write(&path, fasta).unwrap();
    fs::write(dir.join("reference.fasta.fai"), fai).unwrap();
    path.to_str().unwrap().to_owned()
}

struct Dataset {
    dir: TempDir,
    first: String,
    second: String,
}

impl Dataset {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect(TMP_CREATE_ERROR);
        #[rustfmt::skip]
        let first = bam(dir.path(), "first", &[
            (0, "ACGTACGTAC", vec![Match(10)]),
            (2, "GTACG", vec![Match(5)]),
            (4, "ACGTT", vec![Match(5)]),
            (5, "CGAC", vec![Match(2), Del(2), Match(2)]),
        ]);
        // The second read has no stored sequence (SEQ = *)
        let second = bam(dir.path(), "second", &[(6, "GTTC", vec![Match(4)]), (8, "", vec![Match(3)])]);
        Self { dir, first, second }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).to_str().unwrap().to_owned()
    }

    fn fasta(&self, records: &[(&str, usize)]) -> String {
        fasta(self.dir.path(), records)
    }
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

mod minor {
    use super::*;

    fn minor(data: &Dataset, extra: &[&str]) -> Result<String, MinorError> {
        let saveto = data.path("calls.tsv");
        let mut args = vec!["test", "-i", &data.first, &data.second, "-o", &saveto, "-t", "2"];
        args.extend(extra);
        run(&args, SubCommand::minor)?;
        Ok(read(saveto))
    }

    #[test]
    fn whole_reference() {
        let data = Dataset::new();
        let result = minor(&data, &["-r", CONTIG]).unwrap();
        let expected = "pos\tvariant\tfirst\tsecond\n\
                        7\t-\t0.3333333333333333\t0\n\
                        8\tT\t0.3333333333333333\t1\n\
                        8\t-\t0.3333333333333333\t0\n\
                        9\tC\t0.5\t1\n";
        assert_eq!(result, expected);
    }

    #[test]
    fn fasta_reference() {
        let data = Dataset::new();
        let fasta = data.fasta(&[(CONTIG, 20)]);
        let expected = minor(&data, &["-r", CONTIG]).unwrap();
        assert_eq!(minor(&data, &["-r", &fasta]).unwrap(), expected);
    }

    #[test]
    fn region() {
        let data = Dataset::new();
        let result = minor(&data, &["-r", CONTIG, "--start", "8", "--end", "10"]).unwrap();
        let expected = "pos\tvariant\tfirst\tsecond\n\
                        8\tT\t0.3333333333333333\t1\n\
                        8\t-\t0.3333333333333333\t0\n\
                        9\tC\t0.5\t1\n";
        assert_eq!(result, expected);

        // Open-ended regions
        let result = minor(&data, &["-r", CONTIG, "--end", "8"]).unwrap();
        assert_eq!(result, "pos\tvariant\tfirst\tsecond\n7\t-\t0.3333333333333333\t0\n");
        let result = minor(&data, &["-r", CONTIG, "--start", "9"]).unwrap();
        assert_eq!(result, "pos\tvariant\tfirst\tsecond\n9\tC\t0.5\t1\n");
    }

    #[test]
    fn custom_alphabet() {
        let data = Dataset::new();
        // Deletions are not counted without the gap symbol
        let result = minor(&data, &["-r", CONTIG, "--alphabet", "ACGT"]).unwrap();
        let expected = "pos\tvariant\tfirst\tsecond\n\
                        8\tT\t0.5\t1\n\
                        9\tC\t0.5\t1\n";
        assert_eq!(result, expected);
    }

    #[test]
    fn duplicated_sample() {
        let data = Dataset::new();
        let saveto = data.path("calls.tsv");
        let args = ["test", "-i", &data.first, &data.first, "-r", CONTIG, "-o", &saveto];
        run(&args, SubCommand::minor).unwrap();

        let result = read(&saveto);
        let mut lines = result.lines();
        assert_eq!(lines.next(), Some("pos\tvariant\tfirst\tfirst"));
        for line in lines {
            let fields = line.split('\t').collect::<Vec<_>>();
            assert_eq!(fields[2], fields[3]);
        }
    }

    #[test]
    fn stats() {
        let data = Dataset::new();
        let stats = data.path("stats.tsv");
        minor(&data, &["-r", CONTIG, "--stats", &stats]).unwrap();

        let expected = "sample\treads\tcounted\tskipped\trejected\ttemplate_len\taligned_len\tbases\n\
                        first\t4\t4\t0\t0\t0\t26\t26\n\
                        second\t2\t1\t1\t0\t0\t7\t4\n";
        assert_eq!(read(stats), expected);
    }

    #[test]
    fn cram() {
        let data = Dataset::new();
        let encoding = data.dir.path().join("encoding");
        fs::create_dir(&encoding).unwrap();
        let cram = data.path("first.cram");
        let reads = [(0, "ACGTACGTAC", vec![Match(10)]), (5, "CGAC", vec![Match(2), Del(2), Match(2)])];
        let encoded = fasta(&encoding, &[(CONTIG, 20)]);
        alignments(Path::new(&cram), &[(CONTIG, 20)], Some(encoded.as_str()), &reads);
        // Records can be decoded only with the reference passed on the command line
        fs::remove_dir_all(&encoding).unwrap();

        let reference = data.fasta(&[(CONTIG, 20)]);
        let saveto = data.path("cram.tsv");
        run(&["test", "-i", &cram, "-r", &reference, "-o", &saveto], SubCommand::minor).unwrap();
        let expected = "pos\tvariant\tfirst\n\
                        7\t-\t0.5\n\
                        8\t-\t0.5\n\
                        9\tC\t0.5\n";
        assert_eq!(read(saveto), expected);
    }

    #[test]
    fn configuration_errors() {
        let data = Dataset::new();
        let config = |x: Result<String, MinorError>| matches!(x, Err(MinorError::Configuration { .. }));

        // Unknown contig
        assert!(config(minor(&data, &["-r", "chrZ"])));
        // Region outside of the reference
        assert!(config(minor(&data, &["-r", CONTIG, "--start", "10", "--end", "30"])));
        assert!(config(minor(&data, &["-r", CONTIG, "--start", "12", "--end", "12"])));
        // More than one sequence in the reference
        let fasta = data.fasta(&[(CONTIG, 20), ("other", 5)]);
        assert!(config(minor(&data, &["-r", &fasta])));
        // Sequence length doesn't match the alignments
        let fasta = data.fasta(&[(CONTIG, 25)]);
        assert!(config(minor(&data, &["-r", &fasta])));

        // Alignments against different assemblies
        let other = alignments(&data.dir.path().join("other.bam"), &[(CONTIG, 20), ("plasmid", 5)], None, &[]);
        let saveto = data.path("calls.tsv");
        let args = ["test", "-i", &data.first, &other, "-r", CONTIG, "-o", &saveto];
        assert!(matches!(run(&args, SubCommand::minor), Err(MinorError::Configuration { .. })));
    }
}

mod basecnt {
    use super::*;

    #[test]
    fn all_contigs() {
        let data = Dataset::new();
        let (basecnt, coverage, stats) = (data.path("basecnt.tsv"), data.path("coverage.tsv"), data.path("stats.tsv"));
        #[rustfmt::skip]
        let args = [
            "test", "-i", &data.first, "--name", "mini", "--first", "1", "--basecnt", &basecnt,
            "--coverage", &coverage, "--stats", &stats,
        ];
        run(&args, SubCommand::basecnt).unwrap();

        let basecnt = read(basecnt);
        let lines = basecnt.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 1 + 20 + 5);
        assert_eq!(lines[0], "ref\tpos\tA\tC\tG\tT\t-");
        assert_eq!(lines[1], "MN908947.3\t1\t1\t0\t0\t0\t0");
        assert_eq!(lines[8], "MN908947.3\t8\t0\t0\t0\t2\t1");
        assert_eq!(lines[9], "MN908947.3\t9\t1\t0\t0\t1\t1");
        assert_eq!(lines[20], "MN908947.3\t20\t0\t0\t0\t0\t0");
        assert_eq!(lines[21], "other\t1\t0\t0\t0\t0\t0");

        let coverage = read(coverage);
        let lines = coverage.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "ref\tpos\tmini");
        let depth = lines[1..12].iter().map(|x| x.rsplit('\t').next().unwrap()).collect::<Vec<_>>();
        assert_eq!(depth, ["1", "1", "2", "2", "3", "4", "4", "3", "3", "2", "1"]);

        let expected = "ref\treads\tcounted\tskipped\trejected\ttemplate_len\taligned_len\tbases\n\
                        MN908947.3\t4\t4\t0\t0\t0\t26\t26\n\
                        other\t0\t0\t0\t0\t0\t0\t0\n";
        assert_eq!(read(stats), expected);
    }

    #[test]
    fn single_contig() {
        let data = Dataset::new();
        let basecnt = data.path("basecnt.tsv");
        let args = ["test", "-i", &data.second, "--contig", CONTIG, "-o", &basecnt];
        run(&args, SubCommand::basecnt).unwrap();

        let basecnt = read(basecnt);
        let lines = basecnt.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 21);
        assert_eq!(lines[7], "MN908947.3\t6\t0\t0\t1\t0\t0");
        assert_eq!(lines[10], "MN908947.3\t9\t0\t1\t0\t0\t0");

        let args = ["test", "-i", &data.second, "--contig", "chrZ", "-o", &basecnt];
        assert!(matches!(run(&args, SubCommand::basecnt), Err(MinorError::Configuration { .. })));
    }

    #[test]
    fn multiple_inputs() {
        let data = Dataset::new();
        let basecnt = data.path("basecnt.tsv");
        let args = ["test", "-i", &data.first, &data.second, "-o", &basecnt];
        assert!(matches!(run(&args, SubCommand::basecnt), Err(MinorError::Configuration { .. })));
    }
}
