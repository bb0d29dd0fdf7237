//! 3D mesh representation and loading.
//!
//! Provides the [`Mesh`] struct for storing positions, UV coordinates and
//! faces, along with Wavefront OBJ loading via the `tobj` crate. A mesh
//! also owns its decoded [`Texture`] and its model transform, so the
//! rendering pipeline only ever borrows it.

use std::fmt;
use std::path::Path;

use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::texture::Texture;

/// A triangle face with 1-based indices into the mesh's vertex and UV
/// arrays, matching the Wavefront `f v/vt/vn` convention.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub uv_a: u32,
    pub uv_b: u32,
    pub uv_c: u32,
}

impl Face {
    pub const fn new(vertices: [u32; 3], uvs: [u32; 3]) -> Self {
        Self {
            a: vertices[0],
            b: vertices[1],
            c: vertices[2],
            uv_a: uvs[0],
            uv_b: uvs[1],
            uv_c: uvs[2],
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    Obj(tobj::LoadError),
    Image(image::ImageError),
    NoModels,
    NoVertices,
    MissingTexcoords,
    InvalidFaces,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Obj(e) => write!(f, "failed to load OBJ: {}", e),
            LoadError::Image(e) => write!(f, "failed to load texture: {}", e),
            LoadError::NoModels => write!(f, "OBJ file contains no models"),
            LoadError::NoVertices => write!(f, "mesh has no vertices"),
            LoadError::MissingTexcoords => {
                write!(f, "mesh has no texture coordinates for its faces")
            }
            LoadError::InvalidFaces => write!(f, "face indices not divisible by 3"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Obj(e) => Some(e),
            LoadError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(e: tobj::LoadError) -> Self {
        LoadError::Obj(e)
    }
}

impl From<image::ImageError> for LoadError {
    fn from(e: image::ImageError) -> Self {
        LoadError::Image(e)
    }
}

pub struct Mesh {
    vertices: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    faces: Vec<Face>,
    texture: Texture,
    scale: Vec3,
    rotation: Vec3,
    translation: Vec3,
}

impl Mesh {
    pub(crate) fn new(
        vertices: Vec<Vec3>,
        texcoords: Vec<Vec2>,
        faces: Vec<Face>,
        texture: Texture,
    ) -> Self {
        Self {
            vertices,
            texcoords,
            faces,
            texture,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            translation: Vec3::ZERO,
        }
    }

    /// Load a mesh from an OBJ file and its texture from an image file.
    ///
    /// Faces keep separate position and UV index triples, so models where
    /// one position is shared by texture seams load correctly.
    pub fn from_obj<P: AsRef<Path> + std::fmt::Debug>(model_path: P, texture_path: P) -> Result<Self, LoadError> {
        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: false,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(model_path, &options)?;

        // For now we only support a single model per file
        let model = models.into_iter().next().ok_or(LoadError::NoModels)?;
        let mesh = model.mesh;

        if mesh.positions.is_empty() {
            return Err(LoadError::NoVertices);
        }
        if mesh.indices.len() % 3 != 0 {
            return Err(LoadError::InvalidFaces);
        }
        if mesh.texcoords.is_empty() || mesh.texcoord_indices.len() != mesh.indices.len() {
            return Err(LoadError::MissingTexcoords);
        }

        // Convert flat [x, y, z, ...] to Vec3
        let vertices: Vec<Vec3> = mesh
            .positions
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();

        // Convert flat [u, v, ...] to Vec2
        let texcoords: Vec<Vec2> = mesh
            .texcoords
            .chunks_exact(2)
            .map(|c| Vec2::new(c[0], c[1]))
            .collect();

        // tobj is 0-based; faces keep the 1-based OBJ convention
        let faces: Vec<Face> = mesh
            .indices
            .chunks_exact(3)
            .zip(mesh.texcoord_indices.chunks_exact(3))
            .map(|(v, t)| Face::new([v[0] + 1, v[1] + 1, v[2] + 1], [t[0] + 1, t[1] + 1, t[2] + 1]))
            .collect();

        let texture = Texture::from_file(texture_path)?;

        Ok(Self::new(vertices, texcoords, faces, texture))
    }

    /// Built-in unit cube with a checkerboard texture, used when no model
    /// file is supplied and by the tests.
    pub fn cube() -> Self {
        let texture = Texture::checkerboard(64, 8, 0xFFC0C0C0, 0xFF303030);
        Self::new(
            CUBE_VERTICES.to_vec(),
            CUBE_TEXCOORDS.to_vec(),
            CUBE_FACES.to_vec(),
            texture,
        )
    }

    pub fn set_transform(&mut self, scale: Vec3, rotation: Vec3, translation: Vec3) {
        self.scale = scale;
        self.rotation = rotation;
        self.translation = translation;
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub(crate) fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub(crate) fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Position of a face corner (indices are 1-based).
    #[inline]
    pub(crate) fn vertex(&self, index: u32) -> Vec3 {
        self.vertices[(index - 1) as usize]
    }

    /// UV coordinate of a face corner (indices are 1-based).
    #[inline]
    pub(crate) fn texcoord(&self, index: u32) -> Vec2 {
        self.texcoords[(index - 1) as usize]
    }

    pub(crate) fn texture(&self) -> &Texture {
        &self.texture
    }
}

pub(crate) const N_CUBE_VERTICES: usize = 8;
pub(crate) const N_CUBE_FACES: usize = 12;

const CUBE_VERTICES: [Vec3; N_CUBE_VERTICES] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
];

const CUBE_TEXCOORDS: [Vec2; 4] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
];

const CUBE_FACES: [Face; N_CUBE_FACES] = [
    // Front face
    Face::new([1, 2, 3], [1, 2, 3]),
    Face::new([1, 3, 4], [1, 3, 4]),
    // Right face
    Face::new([4, 3, 5], [1, 2, 3]),
    Face::new([4, 5, 6], [1, 3, 4]),
    // Back face
    Face::new([6, 5, 7], [1, 2, 3]),
    Face::new([6, 7, 8], [1, 3, 4]),
    // Left face
    Face::new([8, 7, 2], [1, 2, 3]),
    Face::new([8, 2, 1], [1, 3, 4]),
    // Top face
    Face::new([2, 7, 5], [1, 2, 3]),
    Face::new([2, 5, 3], [1, 3, 4]),
    // Bottom face
    Face::new([6, 8, 1], [1, 2, 3]),
    Face::new([6, 1, 4], [1, 3, 4]),
];
