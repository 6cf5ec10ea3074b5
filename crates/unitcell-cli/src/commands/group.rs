use unitcell::{PlaneGroup, PointGroup, SpaceGroup};

use crate::cli::GroupArgs;
use crate::error::{CliError, Result};

pub fn run(args: GroupArgs) -> Result<()> {
    if let Some(number) = args.space {
        let group = SpaceGroup::new(number)?;
        println!("{group}");
        println!("{} symmetry operations", group.operators().len());
        if args.operators {
            for (i, op) in group.operators().iter().enumerate() {
                println!("{:3}  {}", i + 1, op);
            }
        }
    } else if let Some(number) = args.plane {
        let group = PlaneGroup::new(number)?;
        println!("{group}");
        println!("{} symmetry operations", group.operators().len());
        if args.operators {
            for (i, op) in group.operators().iter().enumerate() {
                println!("{:3}  {}", i + 1, op);
            }
        }
    } else if let Some(number) = args.point {
        let group = PointGroup::new(number)?;
        println!("{group}");
        if args.operators {
            for (i, (m, q)) in group
                .rotation_matrices()
                .iter()
                .zip(group.quaternions())
                .enumerate()
            {
                let mut rows = Vec::with_capacity(3);
                for r in 0..3 {
                    rows.push(format!(
                        "({:2.0} {:2.0} {:2.0})",
                        m[(r, 0)],
                        m[(r, 1)],
                        m[(r, 2)]
                    ));
                }
                println!(
                    "{:3}  {}  quat [{:.6}, {:.6}, {:.6}, {:.6}]",
                    i + 1,
                    rows.join(" "),
                    q.w,
                    q.i,
                    q.j,
                    q.k
                );
            }
        }
    } else {
        return Err(CliError::Usage(
            "one of --space, --plane, or --point is required".to_string(),
        ));
    }
    Ok(())
}
