//! Operation documents sent to the GraphQL endpoint

pub const GET_POKEMONS: &str = "
  query GetPokemons($query: PokemonsQueryInput!) {
    pokemons(query: $query) {
      limit
      offset
      count
      edges {
        ...PokemonListFields
      }
    }
  }
  fragment PokemonListFields on Pokemon {
    id
    number
    name
    image
    types
    isFavorite
    maxCP
    maxHP
  }
";

pub const GET_POKEMON_BY_NAME: &str = "
  query GetPokemonByName($name: String!) {
    pokemonByName(name: $name) {
      id
      number
      name
      image
      sound
      types
      isFavorite
      maxCP
      maxHP
      weight { minimum maximum }
      height { minimum maximum }
      evolutions { id name image types isFavorite }
      previousEvolutions { id name image types isFavorite }
    }
  }
";

pub const GET_POKEMON_TYPES: &str = "
  query GetPokemonTypes {
    pokemonTypes
  }
";

pub const FAVORITE_POKEMON: &str = "
  mutation FavoritePokemon($id: ID!) {
    favoritePokemon(id: $id) { id name isFavorite }
  }
";

pub const UNFAVORITE_POKEMON: &str = "
  mutation UnfavoritePokemon($id: ID!) {
    unFavoritePokemon(id: $id) { id name isFavorite }
  }
";
