use clap::{Parser, Subcommand, ValueEnum};
use survey_tin::{
    dtm::{CdtTriangulator, ContourOptions, DelaunatorTriangulator, Triangulator},
    ContourSet, SurveyPoint, TinSurface,
};

/// Triangulation backend used to build surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Delaunator,
    Cdt,
}

impl Backend {
    fn triangulator(self) -> Box<dyn Triangulator> {
        match self {
            Backend::Delaunator => Box::new(DelaunatorTriangulator),
            Backend::Cdt => Box::new(CdtTriangulator),
        }
    }
}

fn invalid_data(msg: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, msg)
}

fn read_points(path: &str) -> std::io::Result<Vec<SurveyPoint>> {
    let contents = std::fs::read_to_string(path)?;
    let mut pts = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < 3 {
            return Err(invalid_data(format!("line {}: expected x,y,z", idx + 1)));
        }
        let mut coords = [0.0f64; 3];
        for (c, part) in coords.iter_mut().zip(&parts) {
            *c = part
                .trim()
                .parse()
                .map_err(|e| invalid_data(format!("line {}: {}", idx + 1, e)))?;
        }
        pts.push(SurveyPoint::from(coords));
    }
    Ok(pts)
}

fn read_surface(path: &str, backend: Backend) -> std::io::Result<TinSurface> {
    let pts = read_points(path)?;
    TinSurface::build_with(pts, backend.triangulator().as_ref())
        .map_err(|e| invalid_data(e.to_string()))
}

fn write_contours_csv(path: &str, set: &ContourSet) -> std::io::Result<()> {
    use std::io::Write;
    let mut file = std::fs::File::create(path)?;
    for (i, contour) in set.contours.iter().enumerate() {
        for p in &contour.points {
            writeln!(file, "{},{}", p.x, p.y)?;
        }
        if i + 1 < set.contours.len() {
            writeln!(file)?;
        }
    }
    Ok(())
}

fn write_contours_json(path: &str, set: &ContourSet) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(set)?;
    std::fs::write(path, json)
}

fn fail(path: &str, err: std::io::Error) -> ! {
    eprintln!("Error reading {}: {}", path, err);
    std::process::exit(1);
}

/// Command line interface for building TIN surfaces from survey points.
#[derive(Parser)]
#[command(name = "survey_tin_cli", version)]
struct Cli {
    /// Triangulation backend
    #[arg(long, value_enum, default_value_t = Backend::Delaunator, global = true)]
    triangulator: Backend,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print point and triangle counts, bounds and elevation statistics.
    Stats { surface: String },
    /// Generate contour polylines from a surface file (x,y,z CSV).
    Contours {
        surface: String,
        output: String,
        #[arg(long)]
        interval: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        min_elevation: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        max_elevation: Option<f64>,
        #[arg(long, default_value_t = 5)]
        major_interval: u32,
    },
    /// Interpolate the surface elevation at a location.
    Elevation {
        surface: String,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Report slope and aspect at a location.
    Slope {
        surface: String,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Stats { surface } => {
            let tin = read_surface(&surface, cli.triangulator).unwrap_or_else(|e| fail(&surface, e));
            let b = tin.bounds();
            let s = tin.statistics();
            println!("Points: {}", tin.points().len());
            println!("Triangles: {}", tin.triangles().len());
            println!(
                "Bounds: x {:.3}..{:.3}, y {:.3}..{:.3}, z {:.3}..{:.3}",
                b.min_x, b.max_x, b.min_y, b.max_y, b.min_z, b.max_z
            );
            println!(
                "Elevation: min {:.3}, max {:.3}, avg {:.3}, range {:.3}",
                s.min_elevation, s.max_elevation, s.avg_elevation, s.elevation_range
            );
            println!("Area: {:.3}", tin.planar_area());
        }
        Commands::Contours {
            surface,
            output,
            interval,
            min_elevation,
            max_elevation,
            major_interval,
        } => {
            let tin = read_surface(&surface, cli.triangulator).unwrap_or_else(|e| fail(&surface, e));
            let options = ContourOptions {
                interval,
                min_elevation,
                max_elevation,
                major_interval,
            };
            let set = tin.contours(&options);
            let res = if output.to_ascii_lowercase().ends_with(".json") {
                write_contours_json(&output, &set)
            } else {
                write_contours_csv(&output, &set)
            };
            match res {
                Ok(()) => println!("Wrote {} contours to {}", set.contours.len(), output),
                Err(e) => {
                    eprintln!("Error writing {}: {}", output, e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Elevation { surface, x, y } => {
            let tin = read_surface(&surface, cli.triangulator).unwrap_or_else(|e| fail(&surface, e));
            match tin.elevation_at(x, y) {
                Some(z) => println!("Elevation: {:.3}", z),
                None => println!("No surface at ({}, {})", x, y),
            }
        }
        Commands::Slope { surface, x, y } => {
            let tin = read_surface(&surface, cli.triangulator).unwrap_or_else(|e| fail(&surface, e));
            match tin.slope_at(x, y) {
                Some(s) => {
                    println!("Slope: {:.3} deg ({:.3}%)", s.slope_degrees, s.slope_percent);
                    println!("Aspect: {:.1} deg {}", s.aspect_degrees, s.aspect_direction);
                }
                None => println!("No surface at ({}, {})", x, y),
            }
        }
    }
}
