//! Wavefront OBJ text import.
//!
//! Only `v` and `f` records contribute geometry; every other marker is
//! skipped, matching the format's common subset. Vertex references are
//! 1-based into the vertices declared so far, and `/`-separated texture or
//! normal sub-indices are ignored. A malformed `v` or `f` line aborts the
//! whole import; partial meshes are never returned.

use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{digit1, multispace1},
    combinator::map_res,
    multi::many1,
    number::complete::float,
    sequence::preceded,
    IResult,
};

use crate::geometry::Mesh;

/// Parse an OBJ document into a mesh with an identity pose.
pub fn parse_obj(input: &str) -> Result<Mesh, String> {
    let mut vertices: Vec<Point3<f32>> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();

    for (number, raw) in input.lines().enumerate() {
        let line = raw.trim();
        match line.split_whitespace().next() {
            Some("v") => {
                let (_, vertex) = parse_vertex(line)
                    .map_err(|e| format!("line {}: invalid vertex: {:?}", number + 1, e))?;
                vertices.push(vertex);
            }
            Some("f") => {
                let (_, refs) = parse_face(line)
                    .map_err(|e| format!("line {}: invalid face: {:?}", number + 1, e))?;
                if refs.len() < 3 {
                    return Err(format!(
                        "line {}: face needs at least three vertices",
                        number + 1
                    ));
                }
                for &index in &refs {
                    if index == 0 || index > vertices.len() {
                        return Err(format!(
                            "line {}: vertex reference {} out of range",
                            number + 1,
                            index
                        ));
                    }
                }
                // 1-based references; n-gons become a triangle fan.
                for i in 1..refs.len() - 1 {
                    faces.push([refs[0] - 1, refs[i] - 1, refs[i + 1] - 1]);
                }
            }
            _ => {}
        }
    }

    log::debug!(
        "parsed OBJ: {} vertices, {} triangles",
        vertices.len(),
        faces.len()
    );
    Ok(Mesh::new(vertices, faces))
}

fn parse_vertex(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = tag("v")(input)?;
    let (input, x) = preceded(multispace1, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn parse_face(input: &str) -> IResult<&str, Vec<usize>> {
    let (input, _) = tag("f")(input)?;
    many1(preceded(multispace1, vertex_reference))(input)
}

fn vertex_reference(input: &str) -> IResult<&str, usize> {
    let (input, index) = map_res(digit1, str::parse::<usize>)(input)?;
    // Swallow `/texture/normal` sub-indices.
    let (input, _) = take_till(|c: char| c.is_whitespace())(input)?;
    Ok((input, index))
}
